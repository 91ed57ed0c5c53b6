//! chartlens-session
//!
//! Chat and analysis orchestration around an owned document index: records
//! finished analyses and chat turns as documents and feeds similar prior
//! text back into new prompts when retrieval is switched on.

pub mod error;
pub mod session;
pub mod stream;
pub mod types;

pub use error::{Result, SessionError};
pub use session::ChartSession;
pub use stream::StreamingReply;
pub use types::{Analysis, ChatMessage, Role, UploadedImage};
