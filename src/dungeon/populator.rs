//! The population pipeline: turns a slot layout into placed, connected rooms.
//!
//! Stages run one at a time through [`DungeonPopulator::advance`]:
//!
//! `Reset -> ReserveBoss -> PlaceEntry -> PlaceEpicRooms -> PlaceNormalRooms
//!  -> ResolveDoors -> BakeNavigation -> LocateActiveRooms -> Idle`
//!
//! A new layout can only begin from `Idle`; anything else is `Busy`.

use bevy::prelude::*;
use rand::Rng;

use super::active::locate_active_rooms;
use super::archetype::{RoomKind, RoomPlacement};
use super::doors::resolve_doors;
use super::error::DungeonError;
use super::host::DungeonHost;
use super::slots::SlotPool;

/// Tunables for one populator.
#[derive(Debug, Clone)]
pub struct PopulationSettings {
    /// Rooms closer than this to an original slot are active.
    pub active_room_distance: f32,
    /// Shop is placed when `rand(0..shop_roll_range) < stage`.
    pub shop_roll_range: u32,
    /// Treasure room is placed when `rand(0..treasure_roll_range) < stage`.
    pub treasure_roll_range: u32,
    /// Number of normal room templates to pick from.
    pub normal_variants: usize,
    /// Collapse repeated active-room entries.
    pub dedupe_active_rooms: bool,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self {
            active_room_distance: 5.0,
            shop_roll_range: 3,
            treasure_roll_range: 2,
            normal_variants: 1,
            dedupe_active_rooms: false,
        }
    }
}

/// Pipeline position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    Reset,
    ReserveBoss,
    PlaceEntry,
    PlaceEpicRooms,
    PlaceNormalRooms,
    ResolveDoors,
    BakeNavigation,
    LocateActiveRooms,
}

impl PipelineStage {
    fn next(self) -> Self {
        match self {
            PipelineStage::Idle => PipelineStage::Idle,
            PipelineStage::Reset => PipelineStage::ReserveBoss,
            PipelineStage::ReserveBoss => PipelineStage::PlaceEntry,
            PipelineStage::PlaceEntry => PipelineStage::PlaceEpicRooms,
            PipelineStage::PlaceEpicRooms => PipelineStage::PlaceNormalRooms,
            PipelineStage::PlaceNormalRooms => PipelineStage::ResolveDoors,
            PipelineStage::ResolveDoors => PipelineStage::BakeNavigation,
            PipelineStage::BakeNavigation => PipelineStage::LocateActiveRooms,
            PipelineStage::LocateActiveRooms => PipelineStage::Idle,
        }
    }
}

/// Owns the slot pool and the rooms placed for the current floor.
#[derive(Debug)]
pub struct DungeonPopulator<R> {
    settings: PopulationSettings,
    stage: PipelineStage,
    pool: SlotPool,
    boss_slot: Option<Vec3>,
    epic_count: usize,
    placements: Vec<RoomPlacement<R>>,
    active_rooms: Vec<usize>,
}

impl<R: Copy + PartialEq + std::fmt::Debug> DungeonPopulator<R> {
    pub fn new(settings: PopulationSettings) -> Self {
        Self {
            settings,
            stage: PipelineStage::Idle,
            pool: SlotPool::default(),
            boss_slot: None,
            epic_count: 0,
            placements: Vec::new(),
            active_rooms: Vec::new(),
        }
    }

    pub fn settings(&self) -> &PopulationSettings {
        &self.settings
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn is_busy(&self) -> bool {
        self.stage != PipelineStage::Idle
    }

    /// Accept a new layout. The first stage runs on the next `advance`.
    pub fn begin(&mut self, slots: &[IVec2]) -> Result<(), DungeonError> {
        if self.is_busy() {
            return Err(DungeonError::Busy);
        }
        self.pool.initialize(slots);
        self.boss_slot = None;
        self.epic_count = 0;
        self.stage = PipelineStage::Reset;
        info!("Populating dungeon with {} slots", slots.len());
        Ok(())
    }

    /// Run the current stage to completion and move to the next one.
    pub fn advance<H>(&mut self, host: &mut H, rng: &mut impl Rng, stage_level: u32) -> PipelineStage
    where
        H: DungeonHost<Room = R>,
    {
        let current = self.stage;
        match current {
            PipelineStage::Idle => return PipelineStage::Idle,
            PipelineStage::Reset => self.teardown(host),
            PipelineStage::ReserveBoss => {
                self.boss_slot = self
                    .pool
                    .peek_entry()
                    .and_then(|entry| self.pool.reserve_boss(entry));
            }
            PipelineStage::PlaceEntry => {
                if let Some(slot) = self.pool.reserve_entry() {
                    self.place(host, RoomKind::Entry, 0, slot);
                }
            }
            PipelineStage::PlaceEpicRooms => self.place_epic_rooms(host, rng, stage_level),
            PipelineStage::PlaceNormalRooms => self.place_normal_rooms(host, rng),
            PipelineStage::ResolveDoors => {
                let tagged = resolve_doors(host);
                debug!("Connected {} doors", tagged);
            }
            PipelineStage::BakeNavigation => {
                for placement in &self.placements {
                    host.bake_navigation(placement.handle);
                }
            }
            PipelineStage::LocateActiveRooms => {
                self.active_rooms = locate_active_rooms(
                    self.pool.original(),
                    &self.placements,
                    self.settings.active_room_distance,
                    self.settings.dedupe_active_rooms,
                );
                info!(
                    "Dungeon ready: {} rooms, {} active",
                    self.placements.len(),
                    self.active_rooms.len()
                );
            }
        }
        self.stage = current.next();
        debug!("Population stage {:?} done, next {:?}", current, self.stage);
        self.stage
    }

    /// Begin a layout and drive every stage in one call.
    pub fn populate<H>(
        &mut self,
        slots: &[IVec2],
        host: &mut H,
        rng: &mut impl Rng,
        stage_level: u32,
    ) -> Result<(), DungeonError>
    where
        H: DungeonHost<Room = R>,
    {
        self.begin(slots)?;
        while self.advance(host, rng, stage_level) != PipelineStage::Idle {}
        Ok(())
    }

    /// Tear down every placed room and cancel any pipeline in progress.
    ///
    /// Teardown completes before this returns, so no room from the previous
    /// floor survives into the next one.
    pub fn reset<H: DungeonHost<Room = R>>(&mut self, host: &mut H) {
        self.teardown(host);
        self.pool.initialize(&[]);
        self.boss_slot = None;
        self.epic_count = 0;
        self.stage = PipelineStage::Idle;
    }

    /// Open the active room at `index` and switch on its portal.
    pub fn clear_room<H: DungeonHost<Room = R>>(
        &self,
        index: usize,
        host: &mut H,
    ) -> Result<(), DungeonError> {
        let placement = self.active_room(index).ok_or(DungeonError::IndexOutOfRange {
            index,
            len: self.active_rooms.len(),
        })?;
        host.open_room(placement.handle);
        host.portal_on(placement.handle);
        Ok(())
    }

    pub fn placements(&self) -> &[RoomPlacement<R>] {
        &self.placements
    }

    /// Active rooms in detection order, duplicates included.
    pub fn active_rooms(&self) -> impl Iterator<Item = &RoomPlacement<R>> + '_ {
        self.active_rooms.iter().map(|&i| &self.placements[i])
    }

    pub fn active_room(&self, index: usize) -> Option<&RoomPlacement<R>> {
        self.active_rooms.get(index).map(|&i| &self.placements[i])
    }

    pub fn active_room_count(&self) -> usize {
        self.active_rooms.len()
    }

    /// Slots not yet assigned a room.
    pub fn remaining_slots(&self) -> &[Vec3] {
        self.pool.remaining()
    }

    /// First placed room of `kind`.
    pub fn find(&self, kind: RoomKind) -> Option<&RoomPlacement<R>> {
        self.placements.iter().find(|p| p.kind == kind)
    }

    fn teardown<H: DungeonHost<Room = R>>(&mut self, host: &mut H) {
        host.clear_navigation();
        host.despawn_rooms();
        self.placements.clear();
        self.active_rooms.clear();
    }

    fn place<H: DungeonHost<Room = R>>(&mut self, host: &mut H, kind: RoomKind, variant: usize, position: Vec3) {
        match host.spawn_room(kind, variant, position) {
            Some(handle) => self.placements.push(RoomPlacement {
                position,
                kind,
                variant,
                handle,
            }),
            None => warn!("Could not spawn {:?} room (variant {}) at {}", kind, variant, position),
        }
    }

    fn place_epic_rooms<H: DungeonHost<Room = R>>(
        &mut self,
        host: &mut H,
        rng: &mut impl Rng,
        stage_level: u32,
    ) {
        let rolls = [
            (RoomKind::Shop, self.settings.shop_roll_range),
            (RoomKind::Treasure, self.settings.treasure_roll_range),
        ];
        for (kind, range) in rolls {
            let roll = rng.gen_range(0..range.max(1));
            if roll >= stage_level {
                continue;
            }
            let Some(slot) = self.pool.reserve_random(rng) else {
                debug!("No slot left for {:?} room", kind);
                continue;
            };
            self.place(host, kind, 0, slot);
            self.epic_count += 1;
        }
    }

    fn place_normal_rooms<H: DungeonHost<Room = R>>(&mut self, host: &mut H, rng: &mut impl Rng) {
        let fill = self.pool.original().len().saturating_sub(self.epic_count + 1);
        for _ in 0..fill {
            let variant = rng.gen_range(0..self.settings.normal_variants.max(1));
            let Some(slot) = self.pool.reserve_random(rng) else {
                break;
            };
            self.place(host, RoomKind::Normal, variant, slot);
        }
        // The fill count is one larger than the pool, so the boss always lands
        // here once the pool runs dry.
        if let Some(slot) = self.boss_slot.take() {
            self.place(host, RoomKind::Boss, 0, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::mock::{MockCall, MockHost};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn slots(coords: &[(i32, i32)]) -> Vec<IVec2> {
        coords.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    fn populated(coords: &[(i32, i32)], seed: u64, stage_level: u32) -> (DungeonPopulator<u32>, MockHost) {
        let mut populator = DungeonPopulator::new(PopulationSettings {
            normal_variants: 3,
            ..default()
        });
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(seed);
        populator
            .populate(&slots(coords), &mut host, &mut rng, stage_level)
            .unwrap();
        (populator, host)
    }

    fn count(populator: &DungeonPopulator<u32>, kind: RoomKind) -> usize {
        populator.placements().iter().filter(|p| p.kind == kind).count()
    }

    #[test]
    fn places_one_room_per_slot() {
        let layout = [(0, 0), (20, 0), (40, 0), (40, 20), (60, 20), (60, 40), (80, 40)];
        for seed in 0..20 {
            for stage_level in 0..4 {
                let (populator, host) = populated(&layout, seed, stage_level);
                assert_eq!(populator.placements().len(), layout.len());
                assert!(populator.remaining_slots().is_empty());
                assert_eq!(host.live_rooms(), layout.len());
                assert_eq!(count(&populator, RoomKind::Entry), 1);
                assert_eq!(count(&populator, RoomKind::Boss), 1);
                assert!(count(&populator, RoomKind::Shop) <= 1);
                assert!(count(&populator, RoomKind::Treasure) <= 1);
            }
        }
    }

    #[test]
    fn scenario_entry_and_boss_positions() {
        for seed in 0..10 {
            let (populator, _) = populated(&[(0, 0), (1, 0), (2, 0), (10, 10)], seed, 2);
            assert_eq!(populator.find(RoomKind::Entry).unwrap().position, Vec3::ZERO);
            assert_eq!(
                populator.find(RoomKind::Boss).unwrap().position,
                Vec3::new(10.0, 0.0, 10.0)
            );
            let others = populator
                .placements()
                .iter()
                .filter(|p| matches!(p.kind, RoomKind::Normal | RoomKind::Shop | RoomKind::Treasure))
                .count();
            assert_eq!(others, 2);
        }
    }

    #[test]
    fn stage_zero_never_places_epic_rooms() {
        for seed in 0..20 {
            let (populator, _) = populated(&[(0, 0), (20, 0), (40, 0), (60, 0)], seed, 0);
            assert_eq!(count(&populator, RoomKind::Shop), 0);
            assert_eq!(count(&populator, RoomKind::Treasure), 0);
            assert_eq!(count(&populator, RoomKind::Normal), 2);
        }
    }

    #[test]
    fn high_stage_always_places_both_epic_rooms() {
        for seed in 0..20 {
            let (populator, _) = populated(&[(0, 0), (20, 0), (40, 0), (60, 0), (80, 0)], seed, 3);
            assert_eq!(count(&populator, RoomKind::Shop), 1);
            assert_eq!(count(&populator, RoomKind::Treasure), 1);
            assert_eq!(count(&populator, RoomKind::Normal), 1);
        }
    }

    #[test]
    fn two_slot_layout_skips_epic_rooms() {
        let (populator, _) = populated(&[(0, 0), (20, 0)], 3, 5);
        assert_eq!(populator.placements().len(), 2);
        assert_eq!(count(&populator, RoomKind::Boss), 1);
    }

    #[test]
    fn single_slot_layout_is_entry_only() {
        let (populator, _) = populated(&[(0, 0)], 1, 2);
        assert_eq!(populator.placements().len(), 1);
        assert_eq!(populator.placements()[0].kind, RoomKind::Entry);
    }

    #[test]
    fn empty_layout_is_a_zero_room_dungeon() {
        let (populator, host) = populated(&[], 1, 2);
        assert!(populator.placements().is_empty());
        assert_eq!(populator.active_room_count(), 0);
        assert_eq!(host.live_rooms(), 0);
        assert_eq!(populator.stage(), PipelineStage::Idle);
    }

    #[test]
    fn normal_variants_stay_in_range() {
        let layout: Vec<(i32, i32)> = (0..12).map(|i| (i * 20, 0)).collect();
        let (populator, _) = populated(&layout, 11, 0);
        for p in populator.placements() {
            if p.kind == RoomKind::Normal {
                assert!(p.variant < 3);
            } else {
                assert_eq!(p.variant, 0);
            }
        }
    }

    #[test]
    fn begin_while_running_is_busy() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(0);
        populator.begin(&slots(&[(0, 0), (20, 0)])).unwrap();
        populator.advance(&mut host, &mut rng, 1);
        assert_eq!(populator.stage(), PipelineStage::ReserveBoss);
        assert_eq!(populator.begin(&slots(&[(0, 0)])), Err(DungeonError::Busy));
    }

    #[test]
    fn stages_run_in_order() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(0);
        populator.begin(&slots(&[(0, 0), (20, 0), (40, 0)])).unwrap();
        let mut seen = vec![populator.stage()];
        while populator.stage() != PipelineStage::Idle {
            seen.push(populator.advance(&mut host, &mut rng, 1));
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::Reset,
                PipelineStage::ReserveBoss,
                PipelineStage::PlaceEntry,
                PipelineStage::PlaceEpicRooms,
                PipelineStage::PlaceNormalRooms,
                PipelineStage::ResolveDoors,
                PipelineStage::BakeNavigation,
                PipelineStage::LocateActiveRooms,
                PipelineStage::Idle,
            ]
        );
    }

    #[test]
    fn advance_when_idle_does_nothing() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(populator.advance(&mut host, &mut rng, 1), PipelineStage::Idle);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn regeneration_tears_down_before_placing() {
        let (mut populator, mut host) = populated(&[(0, 0), (20, 0), (40, 0)], 5, 1);
        let mut rng = StdRng::seed_from_u64(6);
        host.calls.clear();
        populator
            .populate(&slots(&[(0, 0), (0, 20)]), &mut host, &mut rng, 1)
            .unwrap();

        let first_spawn = host
            .calls
            .iter()
            .position(|c| matches!(c, MockCall::Spawn(..)))
            .unwrap();
        let despawn = host.calls.iter().position(|c| *c == MockCall::DespawnRooms).unwrap();
        let clear_nav = host.calls.iter().position(|c| *c == MockCall::ClearNavigation).unwrap();
        assert!(despawn < first_spawn);
        assert!(clear_nav < first_spawn);
        assert_eq!(host.live_rooms(), 2);
        assert_eq!(populator.placements().len(), 2);
    }

    #[test]
    fn reset_before_population_leaves_no_rooms() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost::default();
        populator.reset(&mut host);
        assert_eq!(host.live_rooms(), 0);
        assert!(populator.placements().is_empty());
    }

    #[test]
    fn reset_cancels_pipeline_in_progress() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(0);
        populator.begin(&slots(&[(0, 0), (20, 0), (40, 0)])).unwrap();
        for _ in 0..4 {
            populator.advance(&mut host, &mut rng, 1);
        }
        assert!(host.live_rooms() > 0);
        populator.reset(&mut host);
        assert_eq!(host.live_rooms(), 0);
        assert!(!populator.is_busy());
        assert!(populator.begin(&slots(&[(0, 0)])).is_ok());
    }

    #[test]
    fn every_room_is_baked() {
        let (populator, host) = populated(&[(0, 0), (20, 0), (40, 0), (60, 0)], 2, 1);
        let baked: Vec<u32> = host
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Bake(room) => Some(*room),
                _ => None,
            })
            .collect();
        let placed: Vec<u32> = populator.placements().iter().map(|p| p.handle).collect();
        assert_eq!(baked, placed);
    }

    #[test]
    fn failed_spawn_is_skipped() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(default());
        let mut host = MockHost {
            refuse: Some(RoomKind::Normal),
            ..default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        populator
            .populate(&slots(&[(0, 0), (20, 0), (40, 0), (60, 0)]), &mut host, &mut rng, 0)
            .unwrap();
        assert_eq!(populator.placements().len(), 2);
        assert!(populator.remaining_slots().is_empty());
    }

    #[test]
    fn every_slot_room_is_active() {
        let layout = [(0, 0), (20, 0), (40, 0), (40, 20)];
        let (populator, _) = populated(&layout, 9, 1);
        assert_eq!(populator.active_room_count(), layout.len());
        let positions: Vec<Vec3> = populator.active_rooms().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(20.0, 0.0, 0.0),
                Vec3::new(40.0, 0.0, 0.0),
                Vec3::new(40.0, 0.0, 20.0),
            ]
        );
    }

    #[test]
    fn close_slots_produce_duplicate_active_rooms() {
        let (populator, _) = populated(&[(0, 0), (1, 0), (2, 0), (10, 10)], 0, 0);
        // (0,0), (1,0) and (2,0) are all within 5 of one another.
        assert_eq!(populator.active_room_count(), 3 * 3 + 1);
    }

    #[test]
    fn dedupe_collapses_active_rooms() {
        let mut populator: DungeonPopulator<u32> = DungeonPopulator::new(PopulationSettings {
            dedupe_active_rooms: true,
            ..default()
        });
        let mut host = MockHost::default();
        let mut rng = StdRng::seed_from_u64(0);
        populator
            .populate(&slots(&[(0, 0), (1, 0), (2, 0), (10, 10)]), &mut host, &mut rng, 0)
            .unwrap();
        assert_eq!(populator.active_room_count(), 4);
    }

    #[test]
    fn clear_room_opens_and_portals_once() {
        let (populator, mut host) = populated(&[(0, 0), (20, 0), (40, 0)], 1, 1);
        host.calls.clear();
        populator.clear_room(1, &mut host).unwrap();
        let target = populator.active_room(1).unwrap().handle;
        assert_eq!(host.calls, vec![MockCall::Open(target), MockCall::PortalOn(target)]);
    }

    #[test]
    fn clear_room_out_of_range_fails() {
        let (populator, mut host) = populated(&[(0, 0), (20, 0), (40, 0)], 1, 1);
        host.calls.clear();
        assert_eq!(
            populator.clear_room(3, &mut host),
            Err(DungeonError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(host.calls.is_empty());
    }
}
