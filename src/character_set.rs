/// Builds a `[bool; 256]` membership table at compile time from one or more
/// byte string literals.
macro_rules! character_set {
    () => {{
        [false; 256]
    }};

    ($value:literal $(,$rest:literal)*) => {{
        const A: &[u8] = $value;
        let mut a = character_set!($($rest),*);
        let mut i = 0;
        while i < A.len() {
            a[A[i] as usize] = true;
            i += 1;
        }
        a
    }}
}

/// Builds a `[u8; 256]` table mapping selected bytes to small nonzero codes,
/// every other byte mapping to `0`. Used where a scanner needs to know both
/// *that* a byte is special and *which* replacement applies.
macro_rules! byte_table {
    ($($byte:literal => $code:expr),* $(,)?) => {{
        let mut t = [0u8; 256];
        $(t[$byte as usize] = $code;)*
        t
    }};
}

pub(crate) use byte_table;
pub(crate) use character_set;
