use {
    bridge_testing::{
        constants::{gateway_address, ALICE, BOB, CHARLIE, HUB, OWNER},
        setup_tracing_subscriber, MockVerifier, ResultExt, TestSuite, FEE_BUDGET,
    },
    bridge_types::{
        endpoint, gateway, hub, Amount, ChainId, Coin, DeliveryOptions, Lane, LaneStatus, Message,
        PacketState, Payload, Response,
    },
};

const HUB_CHAIN: ChainId = 88888;
const ETH: ChainId = 30101;

const USDC: u32 = 1;

fn setup() -> TestSuite {
    setup_tracing_subscriber(tracing::Level::INFO);

    TestSuite::setup().unwrap()
}

fn deposit(suite: &mut TestSuite, amount: Amount) {
    suite.mint_token(ETH, "USDC", ALICE, amount);

    let token = suite.token(ETH, "USDC");
    suite
        .execute_gateway(ETH, ALICE, FEE_BUDGET, gateway::ExecuteMsg::Deposit {
            recipient: BOB,
            assets: vec![Coin { token, amount }],
            options: DeliveryOptions::default(),
        })
        .should_succeed();
}

fn eth_to_hub() -> Lane {
    Lane {
        src_chain: ETH,
        sender: gateway_address(0),
        dst_chain: HUB_CHAIN,
        receiver: HUB,
    }
}

fn in_flight(suite: &TestSuite) -> Vec<Message> {
    suite
        .in_flight
        .iter()
        .map(|packet| packet.message.clone())
        .collect()
}

#[test]
fn mismatched_verifiers_block_the_lane() {
    let mut suite = setup();

    // The sending side's verifiers are not the ones the hub requires.
    let honest = std::mem::replace(&mut suite.signers, vec![
        MockVerifier::new(7),
        MockVerifier::new(8),
        MockVerifier::new(9),
    ]);

    deposit(&mut suite, 2_000_000);

    let mut deliveries = suite.deliver_all();
    assert_eq!(deliveries.len(), 1);

    let message = deliveries[0].message.clone();
    deliveries
        .remove(0)
        .should_fail_with_error("message is not verified");

    let status = suite
        .endpoint(HUB_CHAIN)
        .verification_status(&message)
        .should_succeed();

    assert_eq!(status.state, PacketState::Unverified);
    assert!(!status.quorum_reached);
    assert_eq!(status.missing.len(), 3);
    assert_eq!(status.unknown.len(), 3);
    assert_eq!(suite.endpoint(HUB_CHAIN).lane_status(&eth_to_hub()), LaneStatus {
        last_verified_nonce: 1,
        last_executed_nonce: 1,
        pending: 0,
        skipped: vec![],
    });
    assert_eq!(suite.hub.hub.balance(USDC, BOB), 0);

    // Once the right verifiers attest, the same packet goes through.
    suite.signers = honest;
    suite.verify_all();

    for delivery in suite.execute_all() {
        delivery.should_succeed();
    }

    assert_eq!(suite.hub.hub.balance(USDC, BOB), 2_000_000);
    suite.check_conservation().should_succeed();
}

#[test]
fn verified_packets_wait_for_execution() {
    let mut suite = setup();

    deposit(&mut suite, 1_000_000);
    deposit(&mut suite, 3_000_000);

    suite.advance_blocks(2);
    assert_eq!(suite.relay(), 2);
    suite.verify_all();

    assert_eq!(suite.endpoint(HUB_CHAIN).lane_status(&eth_to_hub()), LaneStatus {
        last_verified_nonce: 3,
        last_executed_nonce: 1,
        pending: 2,
        skipped: vec![],
    });

    let messages = in_flight(&suite);

    // Nonce 3 cannot overtake nonce 2.
    suite
        .deliver(&messages[1])
        .should_fail_with_error("message is out of order");

    for delivery in suite.execute_all() {
        delivery.should_succeed();
    }

    let status = suite.endpoint(HUB_CHAIN).lane_status(&eth_to_hub());
    assert_eq!(status.last_executed_nonce, 3);
    assert_eq!(status.pending, 0);
    assert_eq!(suite.hub.hub.balance(USDC, BOB), 4_000_000);

    // Replaying an executed packet changes nothing.
    suite
        .deliver(&messages[0])
        .should_succeed_and_equal(Response::new());
    assert_eq!(suite.hub.hub.balance(USDC, BOB), 4_000_000);
    assert_eq!(
        suite.endpoint(HUB_CHAIN).packet_state(&messages[0]),
        PacketState::Executed
    );
}

#[test]
fn confirmations_are_required() {
    let mut suite = setup();

    deposit(&mut suite, 1_000_000);

    // Attested straight away, before any block was produced on top.
    suite.relay();
    suite.verify_all();

    let message = in_flight(&suite).remove(0);
    let status = suite
        .endpoint(HUB_CHAIN)
        .verification_status(&message)
        .should_succeed();

    assert!(!status.quorum_reached);
    assert!(status.unknown.is_empty());
    assert_eq!(status.missing.len(), 3);

    suite
        .deliver(&message)
        .should_fail_with_error("message is not verified");

    suite.advance_blocks(1);
    suite.verify_all();
    suite
        .deliver(&message)
        .should_fail_with_error("message is not verified");

    suite.advance_blocks(1);
    suite.verify_all();

    assert_eq!(
        suite.endpoint(HUB_CHAIN).packet_state(&message),
        PacketState::Verified
    );

    for delivery in suite.execute_all() {
        delivery.should_succeed();
    }

    assert_eq!(suite.hub.hub.balance(USDC, BOB), 1_000_000);
}

#[test]
fn tampered_payload_is_rejected() {
    let mut suite = setup();

    deposit(&mut suite, 1_000_000);

    suite.advance_blocks(2);
    suite.relay();
    suite.verify_all();

    let mut message = in_flight(&suite).remove(0);

    let Payload::Deposit { recipient, mut assets } = Payload::decode(&message.payload).unwrap() else {
        panic!("expecting a deposit payload");
    };
    assets[0].amount *= 1_000;
    message.payload = Payload::Deposit { recipient, assets }.encode();

    suite
        .deliver(&message)
        .should_fail_with_error("payload does not match the verified hash");

    assert_eq!(suite.hub.hub.balance(USDC, BOB), 0);

    for delivery in suite.execute_all() {
        delivery.should_succeed();
    }

    assert_eq!(suite.hub.hub.balance(USDC, BOB), 1_000_000);
}

#[test]
fn delegate_skips_and_owner_rescues() {
    let mut suite = setup();

    suite
        .endpoint_mut(HUB_CHAIN)
        .execute(HUB, endpoint::ExecuteMsg::SetDelegate {
            delegate: Some(OWNER),
        })
        .should_succeed();

    assert_eq!(suite.endpoint(HUB_CHAIN).delegate(&HUB), Some(OWNER));

    // A deposit that the hub will refuse while the peer points elsewhere.
    suite
        .execute_hub(OWNER, 0, hub::ExecuteMsg::SetPeer {
            chain: ETH,
            peer: CHARLIE,
        })
        .should_succeed();

    deposit(&mut suite, 2_000_000);

    suite
        .deliver_all()
        .remove(0)
        .should_fail_with_error("not the trusted peer");

    suite
        .execute_hub(OWNER, 0, hub::ExecuteMsg::SetPeer {
            chain: ETH,
            peer: gateway_address(0),
        })
        .should_succeed();

    suite
        .endpoint_mut(HUB_CHAIN)
        .execute(CHARLIE, endpoint::ExecuteMsg::Skip {
            lane: eth_to_hub(),
            nonce: 2,
        })
        .should_fail_with_error("does not have permission");

    suite
        .endpoint_mut(HUB_CHAIN)
        .execute(OWNER, endpoint::ExecuteMsg::Skip {
            lane: eth_to_hub(),
            nonce: 3,
        })
        .should_fail_with_error("message is out of order");

    suite
        .endpoint_mut(HUB_CHAIN)
        .execute(OWNER, endpoint::ExecuteMsg::Skip {
            lane: eth_to_hub(),
            nonce: 2,
        })
        .should_succeed();

    let message = in_flight(&suite).remove(0);
    assert_eq!(
        suite.endpoint(HUB_CHAIN).packet_state(&message),
        PacketState::Skipped
    );

    // The skipped packet is dropped from the relayer's queue as a no-op.
    for delivery in suite.execute_all() {
        delivery.should_succeed_and_equal(Response::new());
    }

    assert_eq!(suite.hub.hub.balance(USDC, BOB), 0);
    suite.check_conservation().should_fail();

    // The assets stay locked with nothing minted against them until the
    // owner pays them back out.
    let token = suite.token(ETH, "USDC");
    suite
        .execute_hub(OWNER, FEE_BUDGET, hub::ExecuteMsg::AdminRescueFromGateway {
            chain: ETH,
            recipient: ALICE,
            assets: vec![Coin {
                token,
                amount: 2_000_000,
            }],
            options: DeliveryOptions::default(),
        })
        .should_succeed();

    for delivery in suite.deliver_all() {
        delivery.should_succeed();
    }

    assert_eq!(suite.token_balance(ETH, "USDC", ALICE), 2_000_000);
    assert_eq!(suite.gateway(ETH).locked_balance(&token), 0);
    suite.check_conservation().should_succeed();
}
