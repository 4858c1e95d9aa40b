//! Hotel Simulation Engine
//!
//! Platform-agnostic room allocation and checkout rewards.
//! This crate holds the grid model, assignment strategies, reward tiers and
//! ticket games without any file or terminal I/O.

pub mod assignment;
pub mod codec;
pub mod desk;
pub mod error;
pub mod hotel;
pub mod reservation;
pub mod rewards;
pub mod rng;
pub mod room;
pub mod ticket;

// Re-export commonly used types
pub use assignment::{AssignmentStrategy, UnknownStrategy};
pub use codec::{CODE_LENGTH, decode_code, decode_marker, encode_marker, generate_code};
pub use desk::{BatchOutcome, Checkout, FrontDesk, SortKey};
pub use error::{ErrorKind, HotelError, Result, TicketTier};
pub use hotel::{Floor, FloorLayout, Hotel, HotelObserver, LogObserver};
pub use reservation::{AssignmentRequest, Reservation, StayPurpose};
pub use rewards::{Band, BandRewards, RATING_RANGE, RewardConfig, RewardConfigError, RoomWeights};
pub use rng::{CountingRng, RngBundle, Stream, StreamDraws};
pub use room::{
    LayoutCell, Occupancy, Room, RoomType, floor_from_prefix, floor_of_room_name, floor_prefix,
    room_name, room_number,
};
pub use ticket::{
    BronzeTicket, DEFAULT_VOCABULARY, DoorSet, GameInput, GoldPhase, GoldTicket, SilverTicket,
    Ticket,
};
