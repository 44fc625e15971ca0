/// Read-through caching against [`Cache`](crate::db::Cache).
///
/// Returns the cached value on a hit. On a miss the future in `$block` is
/// awaited, its value handed to the background writer with `$ttl` seconds to
/// live, and returned. Errors from the lookup or the block propagate with `?`,
/// so the macro must be used inside a function returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let movies: Vec<Movie> = cached!(cache, CacheKey::TopRated(12), 300, async {
///     query_top_rated(&pool, 12).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            tracing::debug!(key = %$key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %$key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
