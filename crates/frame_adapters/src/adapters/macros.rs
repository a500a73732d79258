//! Frame adapter macros
//!
//! Use declarative macros to eliminate the ordering boilerplate shared by all adapters

/// Implement timestamp ordering for a frame adapter
///
/// Generates `PartialEq`, `Eq`, `PartialOrd` and `Ord` keyed on
/// `FrameAdapter::timestamp()`, so adapters can be stored in sorted
/// containers directly. Two frames compare equal when their timestamps are
/// equal; this is an ordering relation, not frame identity.
///
/// # Usage
/// ```ignore
/// impl_timestamp_ordering!(PacmanFrame);
/// ```
macro_rules! impl_timestamp_ordering {
    ($frame:ty) => {
        impl PartialEq for $frame {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                contracts::FrameAdapter::timestamp(self) == contracts::FrameAdapter::timestamp(other)
            }
        }

        impl Eq for $frame {}

        impl PartialOrd for $frame {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $frame {
            #[inline]
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                contracts::FrameAdapter::compare(self, other)
            }
        }
    };
}
