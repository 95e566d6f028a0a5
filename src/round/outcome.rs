//! What an action submission produced.
//!
//! On success the caller gets the state deltas the action caused and the
//! game-log lines it wrote, for a UI or log layer to render. An ignored
//! action is a success with no effect.

use serde::{Deserialize, Serialize};

use crate::core::{Action, ActionKind, EntityId, GameState, LogEntry};
use crate::economy::{CompanyId, HexId, ShareHolder, TileId, TrainId};
use crate::steps::StepKind;

/// A single observable change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateDelta {
    Cash { entity: EntityId, before: i64, after: i64 },
    BankCash { before: i64, after: i64 },
    Shares { corporation: EntityId, holder: ShareHolder, before: u32, after: u32 },
    SharePrice { corporation: EntityId, before: Option<i64>, after: Option<i64> },
    Trains { entity: EntityId, gained: Vec<TrainId>, lost: Vec<TrainId> },
    Tile { hex: HexId, tile: TileId, rotation: u8 },
    Token { hex: HexId, entity: EntityId },
    Company { company: CompanyId, from: Option<EntityId>, to: Option<EntityId> },
    /// The round synthesized and applied an action.
    AutoAction { action: Action },
    /// A step became current and waits for input.
    StepAdvanced { entity: EntityId, step: StepKind },
    TurnEnded { entity: EntityId },
    RoundFinished { round: u32 },
}

impl StateDelta {
    /// Economic differences between two states, in a stable order.
    #[must_use]
    pub fn diff(before: &GameState, after: &GameState) -> Vec<StateDelta> {
        let mut deltas = Vec::new();

        for (player, record) in after.players.iter() {
            let old = before.players[player].cash;
            if old != record.cash {
                deltas.push(StateDelta::Cash {
                    entity: EntityId::player(player),
                    before: old,
                    after: record.cash,
                });
            }
        }
        for entity in after.entities() {
            let old = before.entity(entity.id).ok();
            let old_cash = old.map_or(0, |e| e.cash);
            if old_cash != entity.cash {
                deltas.push(StateDelta::Cash {
                    entity: entity.id,
                    before: old_cash,
                    after: entity.cash,
                });
            }

            let old_trains: Vec<TrainId> = old.map(|e| e.trains.iter().map(|t| t.id).collect()).unwrap_or_default();
            let new_trains: Vec<TrainId> = entity.trains.iter().map(|t| t.id).collect();
            let gained: Vec<TrainId> = new_trains.iter().filter(|t| !old_trains.contains(t)).copied().collect();
            let lost: Vec<TrainId> = old_trains.iter().filter(|t| !new_trains.contains(t)).copied().collect();
            if !gained.is_empty() || !lost.is_empty() {
                deltas.push(StateDelta::Trains {
                    entity: entity.id,
                    gained,
                    lost,
                });
            }
        }
        if before.bank.cash() != after.bank.cash() {
            deltas.push(StateDelta::BankCash {
                before: before.bank.cash(),
                after: after.bank.cash(),
            });
        }

        let mut holdings: Vec<(EntityId, ShareHolder)> = before
            .share_pool
            .iter()
            .chain(after.share_pool.iter())
            .map(|(corp, holder, _)| (corp, holder))
            .collect();
        holdings.sort();
        holdings.dedup();
        for (corporation, holder) in holdings {
            let old = before.share_pool.shares_of(corporation, holder);
            let new = after.share_pool.shares_of(corporation, holder);
            if old != new {
                deltas.push(StateDelta::Shares {
                    corporation,
                    holder,
                    before: old,
                    after: new,
                });
            }
        }

        for entity in after.entities() {
            let old = before.stock_market.share_price(entity.id).map(|p| p.price);
            let new = after.stock_market.share_price(entity.id).map(|p| p.price);
            if old != new {
                deltas.push(StateDelta::SharePrice {
                    corporation: entity.id,
                    before: old,
                    after: new,
                });
            }
        }

        for hex in after.board.hexes() {
            let old = before.board.hex(&hex.id);
            if old.map_or(true, |o| o.tile.id != hex.tile.id || o.rotation != hex.rotation) {
                deltas.push(StateDelta::Tile {
                    hex: hex.id.clone(),
                    tile: hex.tile.id,
                    rotation: hex.rotation,
                });
            }
            for token in &hex.tokens {
                if old.map_or(true, |o| !o.tokens.contains(token)) {
                    deltas.push(StateDelta::Token {
                        hex: hex.id.clone(),
                        entity: *token,
                    });
                }
            }
        }

        for company in after.companies.values() {
            let old = before.companies.get(&company.id).and_then(|c| c.owner);
            if old != company.owner {
                deltas.push(StateDelta::Company {
                    company: company.id,
                    from: old,
                    to: company.owner,
                });
            }
        }

        deltas
    }
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Applied {
        deltas: Vec<StateDelta>,
        /// Game-log lines written while applying the action.
        log: Vec<LogEntry>,
    },
    /// A redundant submission, dropped without effect.
    Ignored { step: StepKind, action: ActionKind },
}

impl ActionOutcome {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, ActionOutcome::Ignored { .. })
    }

    /// Deltas of an applied action (empty when ignored).
    #[must_use]
    pub fn deltas(&self) -> &[StateDelta] {
        match self {
            ActionOutcome::Applied { deltas, .. } => deltas,
            ActionOutcome::Ignored { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Title};

    #[test]
    fn test_diff_cash_and_bank() {
        let config = GameConfig::new(Title::Base).with_seating_shuffle(false);
        let before = GameState::new(config, &["Alice", "Bob"]);
        let mut after = before.clone();
        after.bank_spend(25, EntityId(1)).unwrap();

        let deltas = StateDelta::diff(&before, &after);
        assert_eq!(
            deltas,
            vec![
                StateDelta::Cash {
                    entity: EntityId(1),
                    before: 400,
                    after: 425
                },
                StateDelta::BankCash {
                    before: 11_200,
                    after: 11_175
                },
            ]
        );
    }

    #[test]
    fn test_diff_of_identical_states_is_empty() {
        let state = GameState::new(GameConfig::default(), &["Alice", "Bob"]);
        assert!(StateDelta::diff(&state, &state.clone()).is_empty());
    }
}
