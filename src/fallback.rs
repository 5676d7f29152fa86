//! Ordered attempts with early exit on the first non-empty result.

use std::future::Future;

/// Run `attempt` over `candidates` in order and return the first non-empty
/// result. Later candidates are never started once one succeeds.
pub async fn first_non_empty<I, T, F, Fut>(candidates: I, mut attempt: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Vec<T>>,
{
    for candidate in candidates {
        let items = attempt(candidate).await;
        if !items.is_empty() {
            return items;
        }
    }
    Vec::new()
}

/// Like [`first_non_empty`], but an `Err` from any attempt stops the walk
/// and is returned. Attempts absorb the errors they can recover from.
pub async fn try_first_non_empty<I, T, E, F, Fut>(candidates: I, mut attempt: F) -> Result<Vec<T>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    for candidate in candidates {
        let items = attempt(candidate).await?;
        if !items.is_empty() {
            return Ok(items);
        }
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[tokio::test]
    async fn test_stops_at_first_non_empty() {
        let tried = RefCell::new(Vec::new());
        let result = first_non_empty([0usize, 3, 5], |n| {
            tried.borrow_mut().push(n);
            async move { vec![n; n] }
        })
        .await;

        assert_eq!(result, vec![3, 3, 3]);
        assert_eq!(*tried.borrow(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_all_empty_is_empty() {
        let result: Vec<u8> = first_non_empty([1, 2], |_| async { Vec::new() }).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_try_variant_propagates_error() {
        let tried = RefCell::new(Vec::new());
        let result: Result<Vec<u8>, &str> = try_first_non_empty([1, 2, 3], |n| {
            tried.borrow_mut().push(n);
            async move {
                if n == 2 {
                    Err("boom")
                } else {
                    Ok(Vec::new())
                }
            }
        })
        .await;

        assert_eq!(result, Err("boom"));
        assert_eq!(*tried.borrow(), vec![1, 2]);
    }
}
