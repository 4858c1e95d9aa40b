//! Hotel grid model: floors of rooms built from one shared layout
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{HotelError, Result};
use crate::reservation::{AssignmentRequest, Reservation};
use crate::room::{LayoutCell, Room, RoomType, room_name};

/// 4-connected neighbourhood, as (row, col) deltas.
const ADJACENT_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Grid of layout cells shared by every floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorLayout {
    rows: Vec<Vec<LayoutCell>>,
}

impl FloorLayout {
    #[must_use]
    pub const fn new(rows: Vec<Vec<LayoutCell>>) -> Self {
        Self { rows }
    }

    /// Build a layout from rows of single-letter codes, e.g. `["EEB", "LZE"]`.
    #[must_use]
    pub fn from_codes(rows: &[&str]) -> Option<Self> {
        rows.iter()
            .map(|row| row.chars().map(LayoutCell::from_code).collect::<Option<Vec<_>>>())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row; shorter rows are padded with void cells.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> LayoutCell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(LayoutCell::Void)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<LayoutCell>] {
        &self.rows
    }
}

/// One level of the hotel.
#[derive(Debug, Clone)]
pub struct Floor {
    level: u32,
    row_count: usize,
    col_count: usize,
    rooms: Vec<Room>,
    cells: Vec<Option<usize>>,
    by_name: HashMap<String, usize>,
}

impl Floor {
    /// Materialise every non-void cell of `layout` as a room on `level`.
    #[must_use]
    pub fn new(level: u32, layout: &FloorLayout) -> Self {
        let row_count = layout.row_count();
        let col_count = layout.col_count();
        let mut rooms = Vec::new();
        let mut cells = vec![None; row_count * col_count];
        let mut by_name = HashMap::new();
        let mut counter = 1;

        for row in 0..row_count {
            for col in 0..col_count {
                let LayoutCell::Room(room_type) = layout.cell(row, col) else {
                    continue;
                };
                let name = room_name(level, counter, room_type);
                counter += 1;
                let index = rooms.len();
                cells[row * col_count + col] = Some(index);
                by_name.insert(name.clone(), index);
                rooms.push(Room::new(name, level, row, col, room_type));
            }
        }

        Self {
            level,
            row_count,
            col_count,
            rooms,
            cells,
            by_name,
        }
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Rooms in insertion order (row-major, voids skipped).
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn room_at(&self, row: usize, col: usize) -> Option<&Room> {
        if row >= self.row_count || col >= self.col_count {
            return None;
        }
        self.cells[row * self.col_count + col].map(|index| &self.rooms[index])
    }

    #[must_use]
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.by_name.get(name).map(|index| &self.rooms[*index])
    }

    fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.by_name.get(name).map(|index| &mut self.rooms[*index])
    }

    /// True when `(row, col)` lies on the outer ring of the grid.
    #[must_use]
    pub const fn is_boundary(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.row_count || col + 1 == self.col_count
    }

    /// Occupied rooms among the 4-connected neighbours of `(row, col)`.
    #[must_use]
    pub fn occupied_neighbors(&self, row: usize, col: usize) -> SmallVec<[&Room; 4]> {
        ADJACENT_OFFSETS
            .iter()
            .filter_map(|(dr, dc)| {
                let r = row.checked_add_signed(*dr)?;
                let c = col.checked_add_signed(*dc)?;
                self.room_at(r, c)
            })
            .filter(|room| !room.is_free())
            .collect()
    }
}

/// Receives a callback after every successful occupancy change.
pub trait HotelObserver {
    fn on_reserve(&mut self, room_name: &str);
    fn on_free(&mut self, room_name: &str, room_type: RoomType);
}

/// Default observer: reports occupancy changes through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl HotelObserver for LogObserver {
    fn on_reserve(&mut self, room_name: &str) {
        log::info!("room {room_name} reserved");
    }

    fn on_free(&mut self, room_name: &str, room_type: RoomType) {
        log::info!("room {room_name} ({}) freed", room_type.label());
    }
}

pub struct Hotel {
    layout: FloorLayout,
    floors: Vec<Floor>,
    observer: Box<dyn HotelObserver>,
}

impl fmt::Debug for Hotel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hotel")
            .field("layout", &self.layout)
            .field("floors", &self.floors)
            .finish_non_exhaustive()
    }
}

impl Hotel {
    /// Build `floor_count` identical floors from `layout`.
    #[must_use]
    pub fn new(floor_count: u32, layout: FloorLayout) -> Self {
        let floors = (1..=floor_count)
            .map(|level| Floor::new(level, &layout))
            .collect();
        Self {
            layout,
            floors,
            observer: Box::new(LogObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn HotelObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn HotelObserver>) {
        self.observer = observer;
    }

    #[must_use]
    pub const fn layout(&self) -> &FloorLayout {
        &self.layout
    }

    #[must_use]
    pub fn floor_count(&self) -> u32 {
        u32::try_from(self.floors.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// Floor by 1-based level.
    #[must_use]
    pub fn floor(&self, level: u32) -> Option<&Floor> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.floors.get(index)
    }

    #[must_use]
    pub fn room_at(&self, level: u32, row: usize, col: usize) -> Option<&Room> {
        self.floor(level)?.room_at(row, col)
    }

    /// Every room, floor-ascending, insertion order within a floor.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.floors.iter().flat_map(|floor| floor.rooms().iter())
    }

    #[must_use]
    pub fn available_rooms(&self) -> Vec<&Room> {
        self.rooms().filter(|room| room.is_free()).collect()
    }

    /// Look a room up by name.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`] when no floor holds the room.
    pub fn room(&self, name: &str) -> Result<&Room> {
        self.floors
            .iter()
            .find_map(|floor| floor.room(name))
            .ok_or_else(|| HotelError::RoomNotFound(name.to_string()))
    }

    fn room_mut(&mut self, name: &str) -> Result<&mut Room> {
        self.floors
            .iter_mut()
            .find_map(|floor| floor.room_mut(name))
            .ok_or_else(|| HotelError::RoomNotFound(name.to_string()))
    }

    /// True when `room` sits on its floor's outer ring.
    #[must_use]
    pub fn is_boundary(&self, room: &Room) -> bool {
        self.floor(room.floor())
            .is_some_and(|floor| floor.is_boundary(room.row(), room.col()))
    }

    /// Occupied 4-connected neighbours of `room` on its own floor.
    #[must_use]
    pub fn occupied_neighbors(&self, room: &Room) -> SmallVec<[&Room; 4]> {
        self.floor(room.floor())
            .map(|floor| floor.occupied_neighbors(room.row(), room.col()))
            .unwrap_or_default()
    }

    /// Occupy the requested room and notify the observer.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`] for an unknown room and
    /// [`HotelError::RoomOccupied`] when the room is already taken.
    pub fn reserve_room(&mut self, request: &AssignmentRequest) -> Result<()> {
        let room = self.room_mut(&request.room)?;
        if !room.is_free() {
            return Err(HotelError::RoomOccupied(request.room.clone()));
        }
        room.occupy(request.reservation.clone());
        self.observer.on_reserve(&request.room);
        Ok(())
    }

    /// Release a room and notify the observer, returning the departing guest.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::RoomNotFound`] for an unknown room and
    /// [`HotelError::RoomAlreadyFree`] when nobody occupies it.
    pub fn free_room(&mut self, name: &str) -> Result<Reservation> {
        let room = self.room_mut(name)?;
        let room_type = room.room_type();
        let guest = room.release().ok_or_else(|| HotelError::RoomAlreadyFree {
            name: name.to_string(),
            room_type,
        })?;
        self.observer.on_free(name, room_type);
        Ok(guest)
    }
}
