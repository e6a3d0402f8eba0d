use serde::Serialize;

use crate::routes::ConcreteRoute;

/// Listing -> listing where at least one side is paginated.
pub fn is_pagination_move(previous: &ConcreteRoute, current: &ConcreteRoute) -> bool {
    previous.is_listing()
        && current.is_listing()
        && (previous.is_paginated() || current.is_paginated())
}

pub fn is_detail_entry(previous: &ConcreteRoute, current: &ConcreteRoute) -> bool {
    previous.is_listing() && current.is_detail()
}

pub fn is_detail_exit(previous: &ConcreteRoute, current: &ConcreteRoute) -> bool {
    previous.is_detail() && current.is_listing()
}

pub fn is_archive_to_detail_entry(previous: &ConcreteRoute, current: &ConcreteRoute) -> bool {
    previous.is(ARCHIVE) && current.is_detail()
}

pub fn is_detail_to_archive_exit(previous: &ConcreteRoute, current: &ConcreteRoute) -> bool {
    previous.is_detail() && current.is(ARCHIVE)
}

pub(crate) const ARCHIVE: &str = "/archive";

/// Shape of one navigation, computed once and matched everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    PaginationMove,
    DetailEntry,
    DetailExit,
    ArchiveDetailEntry,
    DetailArchiveExit,
    Plain,
}

impl TransitionKind {
    /// `previous` is `None` on the first render of the tab.
    pub fn classify(previous: Option<&ConcreteRoute>, current: &ConcreteRoute) -> Self {
        let Some(previous) = previous else {
            return TransitionKind::Plain;
        };

        if is_pagination_move(previous, current) {
            TransitionKind::PaginationMove
        } else if is_detail_entry(previous, current) {
            TransitionKind::DetailEntry
        } else if is_detail_exit(previous, current) {
            TransitionKind::DetailExit
        } else if is_archive_to_detail_entry(previous, current) {
            TransitionKind::ArchiveDetailEntry
        } else if is_detail_to_archive_exit(previous, current) {
            TransitionKind::DetailArchiveExit
        } else {
            TransitionKind::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("/page/2"), "/story/xyz", TransitionKind::DetailEntry)]
    #[case(Some("/"), "/story/xyz", TransitionKind::DetailEntry)]
    #[case(Some("/story/xyz"), "/page/2", TransitionKind::DetailExit)]
    #[case(Some("/story/xyz"), "/", TransitionKind::DetailExit)]
    #[case(Some("/page/2"), "/page/3", TransitionKind::PaginationMove)]
    #[case(Some("/"), "/page/2", TransitionKind::PaginationMove)]
    #[case(Some("/page/2"), "/", TransitionKind::PaginationMove)]
    #[case(Some("/"), "/", TransitionKind::Plain)]
    #[case(Some("/archive"), "/story/xyz", TransitionKind::ArchiveDetailEntry)]
    #[case(Some("/story/xyz"), "/archive", TransitionKind::DetailArchiveExit)]
    #[case(Some("/about"), "/settings", TransitionKind::Plain)]
    #[case(Some("/story/a"), "/story/b", TransitionKind::Plain)]
    #[case(None, "/story/xyz", TransitionKind::Plain)]
    fn classifies(
        #[case] previous: Option<&str>,
        #[case] current: &str,
        #[case] expected: TransitionKind,
    ) {
        let previous = previous.map(ConcreteRoute::from);
        let current = ConcreteRoute::from(current);
        assert_eq!(
            TransitionKind::classify(previous.as_ref(), &current),
            expected
        );
    }

    #[test]
    fn pagination_predicate_ignores_home_to_home() {
        let home = ConcreteRoute::from("/");
        assert!(!is_pagination_move(&home, &home));
        assert!(is_pagination_move(
            &ConcreteRoute::from("/page/4"),
            &ConcreteRoute::from("/page/4")
        ));
    }
}
