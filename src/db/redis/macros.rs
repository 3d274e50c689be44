/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues the
/// result for a background write with `$ttl` seconds and returns it. A failed
/// cache read is logged and treated as a miss, so Redis outages only cost
/// latency.
///
/// The optional `$keep` closure decides whether a computed value is worth
/// caching; values it rejects are returned but not stored.
///
/// # Example
/// ```rust,ignore
/// let catalog: Vec<Exercise> = cached!(cache, CacheKey::ExerciseCatalog, 300, async move {
///     provider.fetch_catalog().await
/// }, |catalog: &Vec<Exercise>| !catalog.is_empty())?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {
        $crate::cached!($cache, $key, $ttl, $block, |_| true)
    };
    ($cache:expr, $key:expr, $ttl:expr, $block:expr, $keep:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, falling back to source");
                } else {
                    tracing::debug!(key = %key, "Cache miss");
                }

                match $block.await {
                    Ok(value) => {
                        if ($keep)(&value) {
                            $cache.set_in_background(&key, &value, $ttl);
                        }
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
