use std::collections::BTreeSet;

/// The number of registers in a default pool, `r1` through `r13`.
pub const DEFAULT_REGISTER_COUNT: u8 = 13;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
/// A register of the target machine. Registers are numbered from 1.
pub struct Register(u8);

impl Register {
    /// Creates the register with the given number.
    pub fn new(number: u8) -> Register {
        Register(number)
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A bounded pool of interchangeable registers.
///
/// Allocation always hands out the lowest numbered free register, so the same sequence of
/// `allocate` and `release` calls always produces the same registers.
#[derive(Clone, Debug)]
pub struct RegisterPool {
    capacity: u8,
    free: BTreeSet<Register>,
}

impl Default for RegisterPool {
    fn default() -> RegisterPool {
        RegisterPool::new(DEFAULT_REGISTER_COUNT)
    }
}

impl RegisterPool {
    /// Creates a pool where registers `r1` through `r{capacity}` are free.
    pub fn new(capacity: u8) -> RegisterPool {
        RegisterPool {
            capacity,
            free: (1..=capacity).map(Register).collect(),
        }
    }

    /// The total number of registers in the pool.
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// The number of registers currently handed out.
    pub fn held(&self) -> usize {
        self.capacity as usize - self.free.len()
    }

    /// Returns `true` if `reg` belongs to the pool and is not held.
    pub fn is_free(&self, reg: Register) -> bool {
        self.free.contains(&reg)
    }

    /// Takes the lowest numbered free register.
    pub fn allocate(&mut self) -> Result<Register, CodegenError> {
        match self.free.pop_first() {
            Some(reg) => {
                tracing::trace!(target: "arith::register", %reg, "allocated register");
                Ok(reg)
            }
            None => Err(CodegenError::RegisterPoolExhausted {
                capacity: self.capacity,
            }),
        }
    }

    /// Returns `reg` to the pool.
    ///
    /// `reg` must have been returned by `allocate` and not released since.
    pub fn release(&mut self, reg: Register) {
        debug_assert!(
            (1..=self.capacity).contains(&reg.0),
            "{reg} does not belong to the pool"
        );
        let inserted = self.free.insert(reg);
        debug_assert!(inserted, "{reg} released twice");
        tracing::trace!(target: "arith::register", %reg, "released register");
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An error raised while generating code.
pub enum CodegenError {
    /// Every register was held when another one was needed.
    RegisterPoolExhausted { capacity: u8 },
}

impl std::error::Error for CodegenError {}

impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::RegisterPoolExhausted { capacity } => write!(
                f,
                "register pool exhausted, expression needs more than {capacity} live registers"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_has_thirteen_registers() {
        let pool = RegisterPool::default();
        assert_eq!(pool.capacity(), 13);
        assert_eq!(pool.held(), 0);
        assert!(pool.is_free(Register::new(1)));
        assert!(pool.is_free(Register::new(13)));
        assert!(!pool.is_free(Register::new(14)));
    }

    #[test]
    fn allocate_returns_lowest_free_register() {
        let mut pool = RegisterPool::new(4);
        assert_eq!(pool.allocate(), Ok(Register::new(1)));
        assert_eq!(pool.allocate(), Ok(Register::new(2)));
        assert_eq!(pool.allocate(), Ok(Register::new(3)));
        pool.release(Register::new(2));
        pool.release(Register::new(1));
        assert_eq!(pool.allocate(), Ok(Register::new(1)));
        assert_eq!(pool.allocate(), Ok(Register::new(2)));
        assert_eq!(pool.allocate(), Ok(Register::new(4)));
    }

    #[test]
    fn allocate_on_empty_pool_is_exhausted() {
        let mut pool = RegisterPool::new(2);
        pool.allocate().unwrap();
        pool.allocate().unwrap();
        assert_eq!(pool.held(), 2);
        assert_eq!(
            pool.allocate(),
            Err(CodegenError::RegisterPoolExhausted { capacity: 2 })
        );
        assert_eq!(pool.held(), 2);
    }

    #[test]
    fn same_calls_give_same_registers() {
        let run = || {
            let mut pool = RegisterPool::default();
            let mut got = Vec::new();
            for _ in 0..5 {
                got.push(pool.allocate().unwrap());
            }
            pool.release(got[3]);
            pool.release(got[0]);
            got.push(pool.allocate().unwrap());
            got.push(pool.allocate().unwrap());
            got
        };
        assert_eq!(run(), run());
    }

    #[test]
    #[should_panic(expected = "released twice")]
    #[cfg(debug_assertions)]
    fn double_release_panics_in_debug() {
        let mut pool = RegisterPool::new(2);
        let reg = pool.allocate().unwrap();
        pool.release(reg);
        pool.release(reg);
    }

    #[test]
    fn registers_render_with_r_prefix() {
        assert_eq!(Register::new(7).to_string(), "r7");
    }
}
