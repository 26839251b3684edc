//! Shared ledger fixtures for integration tests.
#![allow(dead_code)]

use battle_core::{
    Address, BaseStats, BattleAction, BattleConfig, EncounterId, TokenId, Transaction, U256,
};
use runtime::{ItemConfig, Ledger, RuntimeConfig, RuntimeError, TxReceipt};

pub const DAY: u64 = 24 * 60 * 60;
pub const HOUR: u64 = 60 * 60;
pub const GENESIS: u64 = 1_000;
/// First cycle start.
pub const T0: u64 = 10 * DAY;
pub const ENERGY_UNIT: u128 = BattleConfig::DEFAULT_REVIVE_COST_UNIT;

pub fn admin() -> Address {
    Address::repeat_byte(0xad)
}

pub fn provider() -> Address {
    Address::repeat_byte(0x77)
}

pub fn alice() -> Address {
    Address::repeat_byte(0x01)
}

pub fn bob() -> Address {
    Address::repeat_byte(0x02)
}

/// A deployed ledger with a randomness provider, clock at `T0`.
pub fn ledger() -> Ledger {
    ledger_with(RuntimeConfig::default())
}

pub fn ledger_with(config: RuntimeConfig) -> Ledger {
    let mut ledger = Ledger::deploy(&config, admin(), GENESIS, T0).expect("deploy");
    ledger
        .submit(Transaction::new(
            admin(),
            BattleAction::GrantRandomnessRole(battle_core::action::GrantRandomnessRoleAction {
                accounts: vec![provider()],
            }),
        ))
        .expect("grant provider");
    ledger.set_timestamp(T0).expect("move to cycle start");
    ledger
}

pub fn mint(ledger: &mut Ledger, token: u64, owner: Address, attack: u32, defense: u32) -> TokenId {
    let token = TokenId(token);
    ledger
        .update_contracts(|contracts| {
            contracts
                .collection
                .mint(admin(), token, owner, BaseStats::new(attack, defense))
        })
        .expect("mint");
    token
}

/// Registers `item`, hands one unit to `owner` and equips it on `token`.
pub fn equip(ledger: &mut Ledger, owner: Address, token: TokenId, item: u64, config: ItemConfig) {
    ledger
        .update_contracts(|contracts| {
            contracts.equipment.register_item(admin(), item, config)?;
            contracts.equipment.mint(admin(), owner, item, 1)
        })
        .expect("register and mint item");
    ledger.equip(owner, token, item).expect("equip");
}

pub fn start_battle(
    ledger: &mut Ledger,
    sender: Address,
    attacker: TokenId,
    defender: TokenId,
) -> Result<EncounterId, RuntimeError> {
    let id = ledger.state().next_encounter_id();
    ledger.submit(Transaction::new(
        sender,
        BattleAction::start_battle(attacker, defender),
    ))?;
    Ok(id)
}

pub fn fulfill(ledger: &mut Ledger, encounter: EncounterId, seed: u64) -> TxReceipt {
    ledger
        .submit(Transaction::new(
            provider(),
            BattleAction::FulfillRandomness(
                battle_core::action::FulfillRandomnessAction::single(encounter, U256::from(seed)),
            ),
        ))
        .expect("fulfill")
}

pub fn finish(
    ledger: &mut Ledger,
    sender: Address,
    encounter: EncounterId,
) -> Result<TxReceipt, RuntimeError> {
    ledger.submit(Transaction::new(sender, BattleAction::finish_them(encounter)))
}

pub fn grant_energy(ledger: &mut Ledger, owner: Address, amount: u128) {
    ledger
        .update_contracts(|contracts| contracts.energy.mint(admin(), owner, amount))
        .expect("mint energy");
}

pub fn admin_tx(ledger: &mut Ledger, action: BattleAction) -> Result<TxReceipt, RuntimeError> {
    ledger.submit(Transaction::new(admin(), action))
}
