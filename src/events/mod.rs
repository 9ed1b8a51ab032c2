//! Engine events and their delivery.
//!
//! ## Key Components
//!
//! - [`GameEvent`]: What happened (join, round start, bid, turn, resolutions, game end)
//! - [`EventListener`]: Anything that consumes events (closures included)
//! - [`EventBus`]: Synchronous fan-out owned by the engine
//! - [`EventLog`]: Shared in-memory recorder
//! - [`ChannelListener`]: Bridge into a tokio channel
//!
//! ## Example Usage
//!
//! ```
//! use perudo_engine::core::{PerudoConfig, UserRef};
//! use perudo_engine::engine::GameEngine;
//! use perudo_engine::events::{EventLog, GameEvent};
//!
//! let config = PerudoConfig::new().with_seed(1);
//! let mut game = GameEngine::with_host(UserRef::new(1, "ana"), config).unwrap();
//! let log = EventLog::new();
//! game.subscribe(log.clone());
//!
//! game.add_player(UserRef::new(2, "ben")).unwrap();
//! assert!(matches!(log.events()[0], GameEvent::PlayerJoined { .. }));
//! ```

mod bus;
mod event;

pub use bus::{ChannelListener, EventBus, EventListener, EventLog, ListenerId};
pub use event::{ChallengeResolution, ExactCallResolution, GameEvent, Standing};
