//! proptest strategies for status sequences and stop orderings

use proptest::prelude::*;

use optiroute_client::models::RawJobStatus;

pub fn non_terminal_status_strategy() -> impl Strategy<Value = RawJobStatus> {
    prop_oneof![Just(RawJobStatus::Pending), Just(RawJobStatus::Processing)]
}

pub fn terminal_status_strategy() -> impl Strategy<Value = RawJobStatus> {
    prop_oneof![Just(RawJobStatus::Completed), Just(RawJobStatus::Failed)]
}

/// Non-terminal prefix followed by one terminal status
pub fn status_sequence_strategy() -> impl Strategy<Value = (Vec<RawJobStatus>, RawJobStatus)> {
    (
        prop::collection::vec(non_terminal_status_strategy(), 0..8),
        terminal_status_strategy(),
    )
}

/// A stop count together with a permutation of `0..count`
pub fn permutation_strategy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..12).prop_flat_map(|n| (Just(n), Just((0..n).collect::<Vec<_>>()).prop_shuffle()))
}
