use {
    crate::Delivery,
    bridge_types::{BridgeError, Response},
    std::fmt::{Debug, Display},
};

/// Assertions on the outcome of a call or a packet delivery.
pub trait ResultExt: Sized {
    type Success;
    type Error;

    /// Panic unless the outcome is a success, which is returned.
    fn should_succeed(self) -> Self::Success;

    /// Panic unless the outcome is an error, which is returned.
    fn should_fail(self) -> Self::Error;

    fn should_succeed_and<F>(self, predicate: F) -> Self::Success
    where
        Self::Success: Debug,
        F: FnOnce(&Self::Success) -> bool,
    {
        let success = self.should_succeed();
        assert!(predicate(&success), "succeeded, but predicate rejected: {success:?}");
        success
    }

    fn should_succeed_and_equal<U>(self, expect: U) -> Self::Success
    where
        Self::Success: Debug + PartialEq<U>,
        U: Debug,
    {
        let success = self.should_succeed();
        assert_eq!(success, expect, "succeeded with an unexpected value!");
        success
    }

    /// Errors match if the message contains `expect` as a substring.
    fn should_fail_with_error<U>(self, expect: U) -> Self::Error
    where
        Self::Error: Display,
        U: Display,
    {
        let error = self.should_fail();
        let expect = expect.to_string();
        assert!(
            error.to_string().contains(&expect),
            "failed with the wrong error! expecting: {expect}, got: {error}"
        );
        error
    }
}

impl<T, E> ResultExt for Result<T, E>
where
    T: Debug,
    E: Display,
{
    type Error = E;
    type Success = T;

    fn should_succeed(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => panic!("expecting success, got error: {err}"),
        }
    }

    fn should_fail(self) -> E {
        match self {
            Err(err) => err,
            Ok(value) => panic!("expecting error, got success: {value:?}"),
        }
    }
}

impl ResultExt for Delivery {
    type Error = BridgeError;
    type Success = Response;

    fn should_succeed(self) -> Response {
        match self.result {
            Ok(response) => response,
            Err(err) => panic!(
                "expecting packet {} on {} to execute, got error: {err}",
                self.message.nonce,
                self.message.lane()
            ),
        }
    }

    fn should_fail(self) -> BridgeError {
        match self.result {
            Err(err) => err,
            Ok(response) => panic!(
                "expecting packet {} on {} to fail, got: {response:?}",
                self.message.nonce,
                self.message.lane()
            ),
        }
    }
}
