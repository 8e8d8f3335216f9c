//! Helper macros shared by filter implementations.

/// Expand to the [`FemtoFilter::link`] and [`FemtoFilter::link_mut`]
/// accessors for a struct that stores its [`FilterLink`] in `$field`.
///
/// ```ignore
/// impl FemtoFilter for MyFilter {
///     femto_filter_link!(link);
///
///     fn decide(&self, _record: &FemtoLogRecord) -> Result<FilterDecision, DecideError> {
///         Ok(FilterDecision::Neutral)
///     }
/// }
/// ```
///
/// [`FemtoFilter::link`]: crate::filters::FemtoFilter::link
/// [`FemtoFilter::link_mut`]: crate::filters::FemtoFilter::link_mut
/// [`FilterLink`]: crate::filters::FilterLink
#[macro_export]
macro_rules! femto_filter_link {
    ($field:ident) => {
        fn link(&self) -> &$crate::filters::FilterLink {
            &self.$field
        }

        fn link_mut(&mut self) -> &mut $crate::filters::FilterLink {
            &mut self.$field
        }
    };
}
