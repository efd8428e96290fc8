//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (segments oldest first, pickups by id)
//! - No rendering, audio or platform dependencies

pub mod camera;
pub mod events;
pub mod player;
pub mod segment;
pub mod session;
pub mod strip;

pub use camera::Camera;
pub use events::{EventQueue, GameEvent, MAX_PENDING_EVENTS, SoundCue};
pub use player::Player;
pub use segment::{AttachmentPoint, Color, HitKind, Pickup, PickupKind, Segment, SegmentTemplate};
pub use session::{FrameInput, GamePhase, PhaseObserver, Session};
pub use strip::{StripManager, StripState};
