//! Seeds the scripted demo simulation.
//!
//! The demo world is small but exercises every read surface: two player
//! nations with leaders and an heir, a married couple, units on both
//! sides, a tribe with its own city, an unowned wonder, full catalogs,
//! and populated diplomacy tables. Commands dispatched against it are
//! recorded by the scripted control surface.

use std::collections::BTreeMap;

use chronicle_sim::{CatalogDomain, ScriptedSimulation};
use chronicle_types::{
    CharacterId, CharacterView, CityId, CityView, PlayerId, PlayerView, TeamAllianceRow,
    TeamDiplomacyRow, TileId, TilePoint, TribeDiplomacyRow, TribeView, UnitId, UnitView,
    WonderOwnership,
};

fn character(id: i32, name: &str, player: i32) -> CharacterView {
    CharacterView {
        id: CharacterId::new(id),
        name: Some(String::from(name)),
        is_dead: false,
        is_leader: false,
        is_heir: false,
        player: Some(PlayerId::new(player)),
        spouse_ids: Vec::new(),
        father_id: None,
        mother_id: None,
        death_reason: None,
    }
}

fn unit(id: i32, unit_type: &str, player: Option<i32>, tile: i32, x: i32, y: i32) -> UnitView {
    UnitView {
        id: UnitId::new(id),
        unit_type: String::from(unit_type),
        player: player.map(PlayerId::new),
        is_dead: false,
        hp: 10,
        location: TilePoint {
            tile_id: TileId::new(tile),
            x,
            y,
        },
    }
}

/// Build the seeded demo simulation at turn 1.
#[allow(clippy::too_many_lines)]
pub fn build() -> ScriptedSimulation {
    let sim = ScriptedSimulation::new();
    sim.set_turn(1);
    sim.set_year(-4000);
    sim.set_current_player(Some(PlayerId::new(0)));

    let mut ruler = character(1, "Dido", 0);
    ruler.is_leader = true;
    ruler.spouse_ids = vec![CharacterId::new(2)];
    let mut consort = character(2, "Acerbas", 0);
    consort.spouse_ids = vec![CharacterId::new(1)];
    let mut heir = character(3, "Hannibal", 0);
    heir.is_heir = true;
    heir.father_id = Some(CharacterId::new(1));
    heir.mother_id = Some(CharacterId::new(2));
    let mut rival = character(4, "Sargon", 1);
    rival.is_leader = true;
    for view in [ruler, consort, heir, rival] {
        sim.upsert_character(view);
    }

    sim.upsert_player(PlayerView {
        index: PlayerId::new(0),
        team: 0,
        nation: Some(String::from("NATION_CARTHAGE")),
        leader_id: Some(CharacterId::new(1)),
        num_cities: 1,
        num_units: 2,
        legitimacy: 8,
        stockpiles: BTreeMap::from([
            (String::from("YIELD_FOOD"), 120),
            (String::from("YIELD_IRON"), 40),
        ]),
    });
    sim.upsert_player(PlayerView {
        index: PlayerId::new(1),
        team: 1,
        nation: Some(String::from("NATION_ASSYRIA")),
        leader_id: Some(CharacterId::new(4)),
        num_cities: 1,
        num_units: 1,
        legitimacy: 6,
        stockpiles: BTreeMap::from([(String::from("YIELD_FOOD"), 90)]),
    });

    sim.upsert_unit(unit(10, "UNIT_SPEARMAN", Some(0), 44, 4, 6));
    sim.upsert_unit(unit(11, "UNIT_WORKER", Some(0), 45, 5, 6));
    sim.upsert_unit(unit(12, "UNIT_ARCHER", Some(1), 90, 12, 3));
    sim.upsert_unit(unit(13, "UNIT_WARRIOR", None, 130, 20, 9));

    sim.upsert_city(CityView {
        id: CityId::new(1),
        name: String::from("Carthage"),
        owner: PlayerId::new(0),
        is_tribe: false,
        population: 4,
        center: TilePoint {
            tile_id: TileId::new(44),
            x: 4,
            y: 6,
        },
        territory_tiles: vec![TileId::new(44), TileId::new(45), TileId::new(46)],
    });
    sim.upsert_city(CityView {
        id: CityId::new(2),
        name: String::from("Assur"),
        owner: PlayerId::new(1),
        is_tribe: false,
        population: 3,
        center: TilePoint {
            tile_id: TileId::new(90),
            x: 12,
            y: 3,
        },
        territory_tiles: vec![TileId::new(90), TileId::new(91)],
    });

    sim.upsert_tribe(TribeView {
        tribe_type: String::from("TRIBE_GAULS"),
        is_alive: true,
        leader_id: None,
        ally_player: None,
        num_units: 1,
        num_cities: 0,
        strength: 5,
    });

    sim.set_wonder("IMPROVEMENT_GREAT_LIGHTHOUSE", WonderOwnership::Unowned);
    sim.set_wonder("IMPROVEMENT_PYRAMIDS", WonderOwnership::Unowned);

    sim.set_catalog(
        CatalogDomain::UnitTypes,
        vec![
            String::from("UNIT_SPEARMAN"),
            String::from("UNIT_WORKER"),
            String::from("UNIT_ARCHER"),
            String::from("UNIT_WARRIOR"),
        ],
    );
    sim.set_catalog(
        CatalogDomain::Projects,
        vec![
            String::from("PROJECT_WALLS"),
            String::from("PROJECT_GRANARY"),
        ],
    );
    sim.set_catalog(
        CatalogDomain::Techs,
        vec![
            String::from("TECH_MASONRY"),
            String::from("TECH_IRONWORKING"),
            String::from("TECH_TRAPPING"),
        ],
    );
    sim.set_catalog(
        CatalogDomain::Promotions,
        vec![
            String::from("PROMOTION_SHOCK"),
            String::from("PROMOTION_GUARD"),
        ],
    );
    sim.set_catalog(CatalogDomain::Tribes, vec![String::from("TRIBE_GAULS")]);

    sim.set_team_diplomacy(vec![TeamDiplomacyRow {
        team_a: 0,
        team_b: 1,
        state: String::from("DIPLOMACY_TRUCE"),
    }]);
    sim.set_team_alliances(vec![TeamAllianceRow {
        team_a: 0,
        team_b: 1,
        allied: false,
    }]);
    sim.set_tribe_diplomacy(vec![
        TribeDiplomacyRow {
            tribe: String::from("TRIBE_GAULS"),
            team: 0,
            state: String::from("DIPLOMACY_WAR"),
        },
        TribeDiplomacyRow {
            tribe: String::from("TRIBE_GAULS"),
            team: 1,
            state: String::from("DIPLOMACY_TRUCE"),
        },
    ]);
    sim.set_tribe_alliances(Vec::new());

    sim
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chronicle_sim::Simulation;

    use super::*;

    #[test]
    fn demo_world_serves_every_read_surface() {
        let sim = build();
        assert_eq!(sim.turn(), 1);
        assert_eq!(sim.characters().unwrap().len(), 4);
        assert_eq!(sim.units().unwrap().len(), 4);
        assert_eq!(sim.cities().unwrap().len(), 2);
        assert_eq!(sim.players().unwrap().len(), 2);
        assert!(sim.tribe_by_key("tribe_gauls").is_some());
        assert_eq!(sim.wonder_kinds().unwrap().len(), 2);
        assert!(!sim.catalog(CatalogDomain::Techs).unwrap().is_empty());
        assert_eq!(sim.team_diplomacy().unwrap().len(), 1);
    }
}
