//! Portfolio admin client: the library behind the `folio` binary.
//!
//! ## Overview
//!
//! An administrator authenticates against the portfolio API with a shared
//! password, then manages the project list: create, edit, delete and
//! drag-to-reorder. Reordering is optimistic; a rejected order is replaced
//! by a fresh copy of the server's list.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────────┐  events  ┌────────────────────────────────────────────┐
//! │  session.rs  │ <─────── │  api.rs  (ApiClient, ProjectApi trait)     │
//! │ SessionMgr   │          │    └─ SessionStore (token persistence)     │
//! │   └ guard.rs │ ───────> │                                            │
//! └──────────────┘ verify   └────────────────────────────────────────────┘
//!                                        ^
//!                                        │ ProjectApi
//!                           ┌────────────┴───────────────────────────────┐
//!                           │  list.rs  (ProjectListController)          │
//!                           │    ├─ form.rs  (ProjectForm, TagInput)     │
//!                           │    └─ drag.rs  (DragReorder)               │
//!                           └────────────────────────────────────────────┘
//! ```
//!
//! ## Supporting Modules
//!
//! | Module   | Responsibility                                              |
//! |----------|-------------------------------------------------------------|
//! | `models` | Wire types: `Project`, `ProjectPayload`, `ProjectOrder`     |
//! | `media`  | Media URL classification for the form preview               |

pub mod api;
pub mod drag;
pub mod form;
pub mod guard;
pub mod list;
pub mod media;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiResponse, ApiResult, ProjectApi, TokenVerifier};
pub use drag::DragReorder;
pub use form::{ProjectForm, TagInput};
pub use guard::{AuthGuard, GuardState};
pub use list::{Notification, ProjectListController, ReorderOutcome};
pub use models::{MediaType, Project, ProjectOrder, ProjectPayload};
pub use session::{FileStore, MemoryStore, Route, SessionManager, SessionStore};
