pub mod kind;
pub mod plan;

pub use kind::{
    is_archive_to_detail_entry, is_detail_entry, is_detail_exit, is_detail_to_archive_exit,
    is_pagination_move, TransitionKind,
};
pub use plan::{marker_class, MarkerClass, ScrollPolicy, TransitionCoordinator, TransitionPlan};
