//! The per-turn snapshot diff engine.
//!
//! [`EventDetector`] owns one snapshot per entity category plus the turn
//! each was last processed at. A detect pass either establishes a baseline
//! (first call for a category, or no turn advance since the last pass) or
//! diffs the live population against the stored snapshot using the
//! category's rules. Snapshots are replaced wholesale; read failures are
//! logged and absorbed, never propagated to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use chronicle_sim::Simulation;
use chronicle_types::{
    CharacterId, CharacterView, CityId, CityView, EntityCategory, PlayerId, TurnEvent, UnitId,
    UnitView, WonderOwnership,
};

use crate::cache::EventCache;

/// Computes domain events at turn boundaries by diffing successive
/// population snapshots.
///
/// One instance exists per process, owned by the authoritative task; all
/// mutation happens there. Consumers read results through the shared
/// [`EventCache`].
pub struct EventDetector {
    cache: Arc<EventCache>,
    characters: BTreeMap<CharacterId, CharacterView>,
    units: BTreeMap<UnitId, UnitView>,
    cities: BTreeMap<CityId, CityView>,
    wonders: BTreeMap<String, WonderOwnership>,
    last_processed: BTreeMap<EntityCategory, u32>,
}

impl EventDetector {
    /// Create a detector publishing into the given cache.
    pub const fn new(cache: Arc<EventCache>) -> Self {
        Self {
            cache,
            characters: BTreeMap::new(),
            units: BTreeMap::new(),
            cities: BTreeMap::new(),
            wonders: BTreeMap::new(),
            last_processed: BTreeMap::new(),
        }
    }

    /// Run a detect pass for one category at the simulation's current turn.
    ///
    /// Returns the computed event list and stores it in the cache. A
    /// baseline pass (first call, or current turn not past the
    /// last-processed turn) refreshes the snapshot and returns an empty
    /// list without synthesizing creation events for the pre-existing
    /// population.
    pub async fn detect(
        &mut self,
        category: EntityCategory,
        sim: &dyn Simulation,
    ) -> Vec<TurnEvent> {
        let turn = sim.turn();
        let is_baseline = self
            .last_processed
            .get(&category)
            .is_none_or(|last| turn <= *last);

        let events = if is_baseline {
            // A failed baseline refresh leaves the category unprocessed so
            // the next call establishes the baseline instead of diffing
            // against an empty snapshot.
            if self.refresh(category, sim) {
                self.last_processed.insert(category, turn);
            }
            Vec::new()
        } else {
            let events = match category {
                EntityCategory::Character => self.diff_characters(sim),
                EntityCategory::Unit => self.diff_units(sim),
                EntityCategory::City => self.diff_cities(sim),
                EntityCategory::Wonder => self.diff_wonders(sim),
            };
            self.last_processed.insert(category, turn);
            events
        };

        self.cache.store(category, events.clone()).await;
        events
    }

    /// The cache this detector publishes into.
    pub const fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    /// Establish baselines for every category without emitting events.
    ///
    /// Called once when the simulation first becomes ready, so the initial
    /// population is never reported as newly created.
    pub async fn baseline(&mut self, sim: &dyn Simulation) {
        let turn = sim.turn();
        for category in EntityCategory::ALL {
            if self.refresh(category, sim) {
                self.last_processed.insert(category, turn);
            }
            self.cache.store(category, Vec::new()).await;
        }
        tracing::info!(turn, "baseline snapshots captured");
    }

    fn refresh(&mut self, category: EntityCategory, sim: &dyn Simulation) -> bool {
        match category {
            EntityCategory::Character => match sim.characters() {
                Ok(population) => {
                    self.characters = population.into_iter().map(|c| (c.id, c)).collect();
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "character snapshot refresh failed");
                    false
                }
            },
            EntityCategory::Unit => match sim.units() {
                Ok(population) => {
                    self.units = population
                        .into_iter()
                        .filter(|u| !u.is_dead)
                        .map(|u| (u.id, u))
                        .collect();
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "unit snapshot refresh failed");
                    false
                }
            },
            EntityCategory::City => match sim.cities() {
                Ok(population) => {
                    self.cities = population.into_iter().map(|c| (c.id, c)).collect();
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, "city snapshot refresh failed");
                    false
                }
            },
            EntityCategory::Wonder => {
                let kinds = match sim.wonder_kinds() {
                    Ok(kinds) => kinds,
                    Err(error) => {
                        tracing::warn!(%error, "wonder kind listing failed");
                        return false;
                    }
                };
                let mut next = BTreeMap::new();
                for kind in kinds {
                    match sim.wonder_ownership(&kind) {
                        Ok(ownership) => {
                            next.insert(kind, ownership);
                        }
                        Err(error) => {
                            tracing::warn!(wonder = %kind, %error, "wonder ownership read failed");
                        }
                    }
                }
                self.wonders = next;
                true
            }
        }
    }

    fn diff_characters(&mut self, sim: &dyn Simulation) -> Vec<TurnEvent> {
        let population = match sim.characters() {
            Ok(population) => population,
            Err(error) => {
                tracing::warn!(%error, "character population read failed, keeping snapshot");
                return Vec::new();
            }
        };
        let current: BTreeMap<CharacterId, CharacterView> =
            population.into_iter().map(|c| (c.id, c)).collect();

        let mut events = Vec::new();
        for (id, cur) in &current {
            let Some(old) = self.characters.get(id) else {
                let mut parent_ids = Vec::new();
                if let Some(father) = cur.father_id {
                    parent_ids.push(father);
                }
                if let Some(mother) = cur.mother_id {
                    parent_ids.push(mother);
                }
                events.push(TurnEvent::CharacterBorn {
                    character_id: *id,
                    parent_ids,
                });
                continue;
            };

            if !old.is_dead && cur.is_dead {
                events.push(TurnEvent::CharacterDied {
                    character_id: *id,
                    death_reason: cur.death_reason.clone(),
                });
            }
            if !old.is_leader && cur.is_leader {
                events.push(TurnEvent::LeaderChanged {
                    player_id: cur.player,
                    new_leader_id: *id,
                    old_leader_id: self.previous_flag_holder(*id, cur.player, |c| c.is_leader),
                });
            }
            if !old.is_heir && cur.is_heir {
                events.push(TurnEvent::HeirChanged {
                    player_id: cur.player,
                    new_heir_id: *id,
                    old_heir_id: self.previous_flag_holder(*id, cur.player, |c| c.is_heir),
                });
            }
            for spouse in &cur.spouse_ids {
                // Both sides of a new marriage observe the gained spouse;
                // only the lower id reports it.
                if *id < *spouse && !old.spouse_ids.contains(spouse) {
                    events.push(TurnEvent::CharacterMarried {
                        character1_id: *id,
                        character2_id: *spouse,
                    });
                }
            }
        }

        self.characters = current;
        events
    }

    fn previous_flag_holder(
        &self,
        new_holder: CharacterId,
        player: Option<PlayerId>,
        flag: impl Fn(&CharacterView) -> bool,
    ) -> Option<CharacterId> {
        self.characters
            .values()
            .find(|old| old.id != new_holder && old.player == player && flag(old))
            .map(|old| old.id)
    }

    fn diff_units(&mut self, sim: &dyn Simulation) -> Vec<TurnEvent> {
        let population = match sim.units() {
            Ok(population) => population,
            Err(error) => {
                tracing::warn!(%error, "unit population read failed, keeping snapshot");
                return Vec::new();
            }
        };
        let current: BTreeMap<UnitId, UnitView> =
            population.into_iter().map(|u| (u.id, u)).collect();

        let mut events = Vec::new();
        for (id, old) in &self.units {
            let gone = current.get(id).is_none_or(|u| u.is_dead);
            if gone {
                events.push(TurnEvent::UnitKilled {
                    unit_id: *id,
                    unit_type: old.unit_type.clone(),
                    last_owner_id: old.player,
                    last_location: old.location,
                });
            }
        }
        for (id, cur) in &current {
            if !cur.is_dead && !self.units.contains_key(id) {
                events.push(TurnEvent::UnitCreated {
                    unit_id: *id,
                    unit_type: cur.unit_type.clone(),
                    player_id: cur.player,
                    location: cur.location,
                });
            }
        }

        // Dead units never enter the snapshot, so a unit's death is
        // reported at most once.
        self.units = current.into_values().filter(|u| !u.is_dead).map(|u| (u.id, u)).collect();
        events
    }

    fn diff_cities(&mut self, sim: &dyn Simulation) -> Vec<TurnEvent> {
        let population = match sim.cities() {
            Ok(population) => population,
            Err(error) => {
                tracing::warn!(%error, "city population read failed, keeping snapshot");
                return Vec::new();
            }
        };
        let current: BTreeMap<CityId, CityView> =
            population.into_iter().map(|c| (c.id, c)).collect();

        let mut events = Vec::new();
        for (id, cur) in &current {
            match self.cities.get(id) {
                Some(old) if old.owner != cur.owner => {
                    events.push(TurnEvent::CityCaptured {
                        city_id: *id,
                        city_name: cur.name.clone(),
                        old_owner_id: old.owner,
                        new_owner_id: cur.owner,
                        was_tribe: old.is_tribe,
                    });
                }
                Some(_) => {}
                None => {
                    events.push(TurnEvent::CityFounded {
                        city_id: *id,
                        city_name: cur.name.clone(),
                        player_id: cur.owner,
                        location: cur.center,
                    });
                }
            }
        }

        self.cities = current;
        events
    }

    fn diff_wonders(&mut self, sim: &dyn Simulation) -> Vec<TurnEvent> {
        let kinds = match sim.wonder_kinds() {
            Ok(kinds) => kinds,
            Err(error) => {
                tracing::warn!(%error, "wonder kind listing failed, keeping snapshot");
                return Vec::new();
            }
        };

        let mut next = BTreeMap::new();
        let mut events = Vec::new();
        for kind in kinds {
            let ownership = match sim.wonder_ownership(&kind) {
                Ok(ownership) => ownership,
                Err(error) => {
                    tracing::warn!(wonder = %kind, %error, "wonder ownership read failed");
                    // Carry the previous value forward so a later pass does
                    // not misread the recovery as a completion.
                    if let Some(old) = self.wonders.get(&kind) {
                        next.insert(kind, old.clone());
                    }
                    continue;
                }
            };

            let previously_owned = self
                .wonders
                .get(&kind)
                .is_some_and(WonderOwnership::is_owned);
            if !previously_owned {
                match &ownership {
                    WonderOwnership::Player(player) => {
                        events.push(TurnEvent::WonderCompleted {
                            wonder: kind.clone(),
                            city_id: player_wonder_city(sim, *player, &kind),
                            player_id: Some(*player),
                            tribe: None,
                        });
                    }
                    WonderOwnership::Tribe(tribe) => {
                        events.push(TurnEvent::WonderCompleted {
                            wonder: kind.clone(),
                            city_id: sim.tribe_wonder_city(&kind, tribe),
                            player_id: None,
                            tribe: Some(tribe.clone()),
                        });
                    }
                    WonderOwnership::Unowned => {}
                }
            }
            next.insert(kind, ownership);
        }

        self.wonders = next;
        events
    }
}

/// Scan a player's cities for the one whose territory holds the wonder.
///
/// The first tile whose improvement matches the wonder kind is
/// authoritative; a wonder cannot exist in more than one city.
fn player_wonder_city(sim: &dyn Simulation, player: PlayerId, wonder: &str) -> Option<CityId> {
    let cities = sim.cities().ok()?;
    for city in cities.iter().filter(|c| c.owner == player && !c.is_tribe) {
        for tile in &city.territory_tiles {
            if sim.tile_improvement(*tile).is_some_and(|imp| imp == wonder) {
                return Some(city.id);
            }
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chronicle_sim::ScriptedSimulation;
    use chronicle_types::{TileId, TilePoint};

    fn detector() -> EventDetector {
        EventDetector::new(Arc::new(EventCache::new()))
    }

    fn character(id: i32) -> CharacterView {
        CharacterView {
            id: CharacterId::new(id),
            name: None,
            is_dead: false,
            is_leader: false,
            is_heir: false,
            player: Some(PlayerId::new(0)),
            spouse_ids: Vec::new(),
            father_id: None,
            mother_id: None,
            death_reason: None,
        }
    }

    fn unit(id: i32) -> UnitView {
        UnitView {
            id: UnitId::new(id),
            unit_type: String::from("UNIT_SPEARMAN"),
            player: Some(PlayerId::new(0)),
            is_dead: false,
            hp: 10,
            location: TilePoint {
                tile_id: TileId::new(id * 10),
                x: id,
                y: 0,
            },
        }
    }

    fn city(id: i32, owner: i32) -> CityView {
        CityView {
            id: CityId::new(id),
            name: format!("City {id}"),
            owner: PlayerId::new(owner),
            is_tribe: false,
            population: 3,
            center: TilePoint {
                tile_id: TileId::new(id * 100),
                x: id,
                y: id,
            },
            territory_tiles: vec![TileId::new(id * 100)],
        }
    }

    #[tokio::test]
    async fn first_pass_is_baseline_without_creation_events() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_character(character(1));
        sim.upsert_unit(unit(1));
        sim.upsert_city(city(1, 0));

        let mut detector = detector();
        for category in EntityCategory::ALL {
            assert!(detector.detect(category, &sim).await.is_empty());
        }
    }

    #[tokio::test]
    async fn repeated_detect_without_turn_advance_stays_empty() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_unit(unit(1));

        let mut detector = detector();
        assert!(detector.detect(EntityCategory::Unit, &sim).await.is_empty());
        assert!(detector.detect(EntityCategory::Unit, &sim).await.is_empty());

        // The same-turn passes left the baseline intact: only the unit
        // added after them is reported once the turn advances.
        sim.upsert_unit(unit(2));
        sim.set_turn(2);
        let events = detector.detect(EntityCategory::Unit, &sim).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            TurnEvent::UnitCreated { unit_id, .. } if *unit_id == UnitId::new(2)
        ));
    }

    #[tokio::test]
    async fn marriage_reported_once_by_lower_id() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_character(character(3));
        sim.upsert_character(character(7));

        let mut detector = detector();
        detector.detect(EntityCategory::Character, &sim).await;

        let mut a = character(3);
        a.spouse_ids = vec![CharacterId::new(7)];
        let mut b = character(7);
        b.spouse_ids = vec![CharacterId::new(3)];
        sim.upsert_character(a);
        sim.upsert_character(b);
        sim.set_turn(2);

        let events = detector.detect(EntityCategory::Character, &sim).await;
        assert_eq!(
            events,
            vec![TurnEvent::CharacterMarried {
                character1_id: CharacterId::new(3),
                character2_id: CharacterId::new(7),
            }]
        );
    }

    #[tokio::test]
    async fn leader_change_pairs_with_previous_holder() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        let mut old_leader = character(1);
        old_leader.is_leader = true;
        sim.upsert_character(old_leader);
        sim.upsert_character(character(2));

        let mut detector = detector();
        detector.detect(EntityCategory::Character, &sim).await;

        let mut deposed = character(1);
        deposed.is_leader = false;
        let mut crowned = character(2);
        crowned.is_leader = true;
        sim.upsert_character(deposed);
        sim.upsert_character(crowned);
        sim.set_turn(2);

        let events = detector.detect(EntityCategory::Character, &sim).await;
        assert_eq!(
            events,
            vec![TurnEvent::LeaderChanged {
                player_id: Some(PlayerId::new(0)),
                new_leader_id: CharacterId::new(2),
                old_leader_id: Some(CharacterId::new(1)),
            }]
        );
    }

    #[tokio::test]
    async fn dead_unit_reported_killed_exactly_once() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_unit(unit(1));

        let mut detector = detector();
        detector.detect(EntityCategory::Unit, &sim).await;

        let mut dead = unit(1);
        dead.is_dead = true;
        sim.upsert_unit(dead);
        sim.set_turn(2);
        let events = detector.detect(EntityCategory::Unit, &sim).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], TurnEvent::UnitKilled { .. }));

        // Still present and dead next turn: no repeat.
        sim.set_turn(3);
        assert!(detector.detect(EntityCategory::Unit, &sim).await.is_empty());
    }

    #[tokio::test]
    async fn owner_change_is_capture_not_founding() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_city(city(5, 0));

        let mut detector = detector();
        detector.detect(EntityCategory::City, &sim).await;

        sim.upsert_city(city(5, 1));
        sim.set_turn(2);
        let events = detector.detect(EntityCategory::City, &sim).await;
        assert_eq!(
            events,
            vec![TurnEvent::CityCaptured {
                city_id: CityId::new(5),
                city_name: String::from("City 5"),
                old_owner_id: PlayerId::new(0),
                new_owner_id: PlayerId::new(1),
                was_tribe: false,
            }]
        );
    }

    #[tokio::test]
    async fn wonder_completion_resolves_owning_city() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_city(city(2, 0));
        sim.set_wonder("IMPROVEMENT_GREAT_LIGHTHOUSE", WonderOwnership::Unowned);

        let mut detector = detector();
        detector.detect(EntityCategory::Wonder, &sim).await;

        sim.set_wonder(
            "IMPROVEMENT_GREAT_LIGHTHOUSE",
            WonderOwnership::Player(PlayerId::new(0)),
        );
        sim.set_tile_improvement(TileId::new(200), "IMPROVEMENT_GREAT_LIGHTHOUSE");
        sim.set_turn(2);

        let events = detector.detect(EntityCategory::Wonder, &sim).await;
        assert_eq!(
            events,
            vec![TurnEvent::WonderCompleted {
                wonder: String::from("IMPROVEMENT_GREAT_LIGHTHOUSE"),
                city_id: Some(CityId::new(2)),
                player_id: Some(PlayerId::new(0)),
                tribe: None,
            }]
        );

        // Already owned: no repeat next turn.
        sim.set_turn(3);
        assert!(detector.detect(EntityCategory::Wonder, &sim).await.is_empty());
    }

    #[tokio::test]
    async fn population_read_failure_keeps_snapshot_for_next_turn() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(1);
        sim.upsert_unit(unit(1));

        let mut detector = detector();
        detector.detect(EntityCategory::Unit, &sim).await;

        sim.remove_unit(UnitId::new(1));
        sim.fail_population_read(EntityCategory::Unit);
        sim.set_turn(2);
        assert!(detector.detect(EntityCategory::Unit, &sim).await.is_empty());

        // The read recovers a turn later; the kill is reported against the
        // retained snapshot rather than lost.
        let sim = {
            let fresh = ScriptedSimulation::new();
            fresh.set_turn(3);
            fresh
        };
        let events = detector.detect(EntityCategory::Unit, &sim).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            TurnEvent::UnitKilled { unit_id, .. } if *unit_id == UnitId::new(1)
        ));
    }

    #[tokio::test]
    async fn baseline_refreshes_all_categories_and_clears_cache() {
        let sim = ScriptedSimulation::new();
        sim.set_turn(4);
        sim.upsert_character(character(1));
        sim.upsert_unit(unit(1));
        sim.upsert_city(city(1, 0));
        sim.set_wonder("IMPROVEMENT_PYRAMIDS", WonderOwnership::Unowned);

        let cache = Arc::new(EventCache::new());
        let mut detector = EventDetector::new(Arc::clone(&cache));
        detector.baseline(&sim).await;

        for category in EntityCategory::ALL {
            assert!(cache.latest(category).await.is_empty());
        }

        // Entities present at baseline are never reported as created.
        sim.set_turn(5);
        assert!(detector.detect(EntityCategory::Unit, &sim).await.is_empty());
    }
}
