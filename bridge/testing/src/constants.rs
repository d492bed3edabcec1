use bridge_types::Addr32;

pub const OWNER: Addr32 = Addr32::mock(1);
pub const HUB: Addr32 = Addr32::mock(2);
pub const RELAYER: Addr32 = Addr32::mock(3);

pub const ALICE: Addr32 = Addr32::mock(10);
pub const BOB: Addr32 = Addr32::mock(11);
pub const CHARLIE: Addr32 = Addr32::mock(12);

/// Gateway of the `index`-th spoke chain of a deployment.
pub const fn gateway_address(index: u8) -> Addr32 {
    Addr32::mock(0x40 + index)
}
