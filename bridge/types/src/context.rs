use crate::{Addr32, Amount, MessageChannel};

/// Context of a state-changing call into a bridge contract.
pub struct MutableCtx<'a> {
    pub sender: Addr32,
    /// Native currency attached to the call.
    pub funds: Amount,
    /// The channel endpoint of the chain the contract lives on.
    pub channel: &'a mut dyn MessageChannel,
}
