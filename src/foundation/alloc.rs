use crate::foundation::error::{EngineError, EngineResult};

/// Allocate `len` copies of `fill`, reporting allocator failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T, what: &str) -> EngineResult<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|e| EngineError::allocation(format!("{what}: {len} elements: {e}")))?;
    out.resize(len, fill);
    Ok(out)
}

/// Empty vector with room for `len` elements.
pub(crate) fn try_with_capacity<T>(len: usize, what: &str) -> EngineResult<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|e| EngineError::allocation(format!("{what}: {len} elements: {e}")))?;
    Ok(out)
}

/// Byte length of a `width x height` RGBA8 buffer.
pub(crate) fn rgba_len(width: u32, height: u32) -> EngineResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| EngineError::allocation(format!("{width}x{height} buffer size overflow")))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/alloc.rs"]
mod tests;
