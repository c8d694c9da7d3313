//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - One update pass per animation frame, scaled by the dt multiplier
//! - Seeded RNG only, so a session replays from its seed
//! - Transient entities and effects recycled through pools
//! - Drawing goes through the `Canvas` seam, never a concrete backend

pub mod clock;
pub mod collision;
pub mod decor;
pub mod director;
pub mod effects;
pub mod enemy;
pub mod obstacle;
pub mod phrases;
pub mod player;
pub mod pool;
pub mod shake;
pub mod state;
pub mod timer;

pub use clock::DeltaClock;
pub use collision::{Rect, near_miss, overlaps};
pub use decor::{Building, Cloud};
pub use director::Director;
pub use effects::EffectPools;
pub use enemy::{Enemy, Projectile};
pub use obstacle::{ElectricHazard, Obstacle, ObstacleKind};
pub use player::{Player, PlayerEvents};
pub use pool::{Drawable, Pool, PoolHandle, Poolable};
pub use shake::ScreenShake;
pub use state::{GamePhase, Hazard, TimerEvent, Tuning};
pub use timer::TimerManager;
