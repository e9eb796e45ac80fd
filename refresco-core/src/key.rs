use std::fmt::Debug;

/// Trait for encoding a call's argument list into a cache key.
///
/// The lookup path identifies entries by the string this trait produces, so
/// implementations must be deterministic: structurally equal argument lists
/// must encode to equal keys, and distinct argument lists to distinct keys.
/// The provided tuple implementations are sensitive to both argument
/// position and argument count, so a one-argument call can never collide
/// with a zero-argument call.
///
/// Tuples of up to eight `Debug` elements are covered out of the box: each
/// element is rendered with `{:?}` and the parts are joined with `|`. The
/// empty tuple encodes to the empty string. This relies on `Debug` output
/// being stable across calls with equal arguments, which holds for the
/// standard scalar and string types; for argument types with unordered
/// `Debug` output (or expensive formatting) implement `CacheKey` directly.
///
/// # Examples
///
/// ```
/// use refresco_core::CacheKey;
///
/// assert_eq!(().cache_key(), "");
/// assert_eq!((7u32,).cache_key(), "7");
/// assert_eq!(("a", 1).cache_key(), "\"a\"|1");
///
/// // Position matters:
/// assert_ne!((1, "a").cache_key(), ("a", 1).cache_key());
/// ```
///
/// Custom argument types can implement the trait for tighter keys:
///
/// ```
/// use refresco_core::CacheKey;
///
/// struct UserId(u64);
///
/// impl CacheKey for UserId {
///     fn cache_key(&self) -> String {
///         format!("user:{}", self.0)
///     }
/// }
///
/// assert_eq!(UserId(42).cache_key(), "user:42");
/// ```
pub trait CacheKey {
    /// Encodes `self` into the cache key string.
    fn cache_key(&self) -> String;
}

impl CacheKey for () {
    fn cache_key(&self) -> String {
        String::new()
    }
}

macro_rules! impl_cache_key_for_tuple {
    ($($ty:ident : $idx:tt),+) => {
        impl<$($ty: Debug),+> CacheKey for ($($ty,)+) {
            fn cache_key(&self) -> String {
                let parts = [$(format!("{:?}", self.$idx)),+];
                parts.join("|")
            }
        }
    };
}

impl_cache_key_for_tuple!(A: 0);
impl_cache_key_for_tuple!(A: 0, B: 1);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_cache_key_for_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
