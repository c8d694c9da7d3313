//! Fixed-capacity object pool
//!
//! Instances live in a slot arena and are recycled, never reconstructed.
//! Every slot is on exactly one of the free list or the active list; a
//! per-slot flag disambiguates, and a generation counter makes stale
//! handles harmless after the slot is recycled.

use crate::renderer::Canvas;

/// A type that can live in a [`Pool`]
pub trait Poolable {
    /// Arguments passed to [`reset`](Self::reset) on acquire
    type Args;

    /// Fully reinitialize every field read by `update`/`draw`
    fn reset(&mut self, args: Self::Args);

    /// Advance by `dt`; return `true` once expired
    fn update(&mut self, dt: f32) -> bool;

    /// Called when the instance goes back to the free list
    fn deactivate(&mut self) {}
}

/// A pooled instance that can draw itself
pub trait Drawable {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32);
}

/// Handle to an acquired instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

struct Slot<T> {
    item: T,
    generation: u32,
    active: bool,
}

/// Reusable-instance allocator
pub struct Pool<T: Poolable> {
    factory: fn() -> T,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    active: Vec<u32>,
    max_size: usize,
}

impl<T: Poolable> Pool<T> {
    /// Create a pool pre-warmed with `initial_size` free instances that never
    /// grows past `max_size` instances in total.
    pub fn new(factory: fn() -> T, initial_size: usize, max_size: usize) -> Self {
        let mut pool = Self {
            factory,
            slots: Vec::with_capacity(max_size.max(initial_size)),
            free: Vec::with_capacity(max_size.max(initial_size)),
            active: Vec::with_capacity(max_size),
            max_size,
        };
        for _ in 0..initial_size {
            let index = pool.push_slot();
            pool.free.push(index);
        }
        pool
    }

    fn push_slot(&mut self) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            item: (self.factory)(),
            generation: 0,
            active: false,
        });
        index
    }

    /// Take an instance, reset it with `args` and mark it active.
    ///
    /// Returns `None` when the pool is exhausted; callers drop the request.
    pub fn acquire(&mut self, args: T::Args) -> Option<PoolHandle> {
        let index = match self.free.pop() {
            Some(index) => index,
            None if self.active.len() < self.max_size => self.push_slot(),
            None => return None,
        };

        let slot = &mut self.slots[index as usize];
        slot.item.reset(args);
        slot.active = true;
        self.active.push(index);
        Some(PoolHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Return an instance to the free list. No-op for stale or inactive handles.
    pub fn release(&mut self, handle: PoolHandle) {
        if !self.is_live(handle) {
            return;
        }
        if let Some(pos) = self.active.iter().position(|&i| i == handle.index) {
            self.release_at(pos);
        }
    }

    fn release_at(&mut self, active_pos: usize) {
        let index = self.active.swap_remove(active_pos);
        let slot = &mut self.slots[index as usize];
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.item.deactivate();
        self.free.push(index);
    }

    fn is_live(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|s| s.active && s.generation == handle.generation)
    }

    /// Update every active instance, releasing the expired ones
    pub fn update(&mut self, dt: f32) {
        self.update_with(|item| item.update(dt));
    }

    /// Run `f` on every active instance in reverse order; instances for
    /// which it returns `true` are released.
    pub fn update_with(&mut self, mut f: impl FnMut(&mut T) -> bool) {
        // Reverse order: swap_remove only moves already-visited entries
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let index = self.active[i] as usize;
            if f(&mut self.slots[index].item) {
                self.release_at(i);
            }
        }
    }

    /// Release every active instance
    pub fn clear(&mut self) {
        while !self.active.is_empty() {
            self.release_at(self.active.len() - 1);
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        if self.is_live(handle) {
            Some(&self.slots[handle.index as usize].item)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_live(handle) {
            Some(&mut self.slots[handle.index as usize].item)
        } else {
            None
        }
    }

    /// Iterate active instances in list order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.active.iter().map(|&i| &self.slots[i as usize].item)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the growth ceiling; live instances are never evicted
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }
}

impl<T: Poolable + Default> Pool<T> {
    /// Pool whose factory is `T::default`
    pub fn with_default(initial_size: usize, max_size: usize) -> Self {
        Self::new(T::default, initial_size, max_size)
    }
}

impl<T: Poolable + Drawable> Pool<T> {
    /// Draw active instances in list order
    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        for item in self.iter() {
            item.draw(ctx, scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Countdown {
        life: f32,
        resets: u32,
        deactivated: bool,
    }

    impl Poolable for Countdown {
        type Args = f32;

        fn reset(&mut self, life: f32) {
            self.life = life;
            self.resets += 1;
            self.deactivated = false;
        }

        fn update(&mut self, dt: f32) -> bool {
            self.life -= dt;
            self.life <= 0.0
        }

        fn deactivate(&mut self) {
            self.deactivated = true;
        }
    }

    fn assert_disjoint(pool: &Pool<Countdown>) {
        for i in &pool.active {
            assert!(!pool.free.contains(i), "slot {i} on both lists");
            assert!(pool.slots[*i as usize].active);
        }
        for i in &pool.free {
            assert!(!pool.slots[*i as usize].active);
        }
        assert_eq!(pool.active.len() + pool.free.len(), pool.slots.len());
    }

    #[test]
    fn test_prewarm_and_reuse() {
        let mut pool: Pool<Countdown> = Pool::with_default(2, 4);
        assert_eq!(pool.free_count(), 2);

        let a = pool.acquire(5.0).unwrap();
        pool.release(a);
        let b = pool.acquire(3.0).unwrap();
        // Same slot recycled, reset ran twice
        assert_eq!(pool.get(b).unwrap().resets, 2);
        assert_eq!(pool.get(b).unwrap().life, 3.0);
        assert!(pool.get(a).is_none(), "stale handle must not resolve");
    }

    #[test]
    fn test_acquire_beyond_capacity_returns_none() {
        let mut pool: Pool<Countdown> = Pool::with_default(0, 3);
        for _ in 0..3 {
            assert!(pool.acquire(1.0).is_some());
        }
        let before = (pool.active_count(), pool.free_count());
        assert!(pool.acquire(1.0).is_none());
        assert_eq!((pool.active_count(), pool.free_count()), before);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool: Pool<Countdown> = Pool::with_default(1, 2);
        let h = pool.acquire(1.0).unwrap();
        pool.release(h);
        pool.release(h);
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.active_count(), 0);
        assert_disjoint(&pool);
    }

    #[test]
    fn test_update_releases_expired_and_deactivates() {
        let mut pool: Pool<Countdown> = Pool::with_default(0, 8);
        let short = pool.acquire(1.0).unwrap();
        let long = pool.acquire(10.0).unwrap();
        pool.acquire(1.5).unwrap();

        pool.update(2.0);
        assert_eq!(pool.active_count(), 1);
        assert!(pool.get(short).is_none());
        assert!(pool.get(long).is_some());
        assert!(pool.slots.iter().filter(|s| !s.active).all(|s| s.item.deactivated));
        assert_disjoint(&pool);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut pool: Pool<Countdown> = Pool::with_default(0, 8);
        for _ in 0..5 {
            pool.acquire(1.0);
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 5);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release(usize),
        Update(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Acquire),
            (0usize..16).prop_map(Op::Release),
            (0.0f32..3.0).prop_map(Op::Update),
        ]
    }

    proptest! {
        #[test]
        fn prop_slot_never_on_both_lists(ops in prop::collection::vec(op(), 0..200), max in 1usize..12) {
            let mut pool: Pool<Countdown> = Pool::with_default(0, max);
            let mut handles = Vec::new();
            for op in ops {
                match op {
                    Op::Acquire => {
                        let full = pool.active_count() == max && pool.free_count() == 0;
                        let got = pool.acquire(2.0);
                        prop_assert_eq!(got.is_none(), full);
                        handles.extend(got);
                    }
                    Op::Release(i) => {
                        if !handles.is_empty() {
                            let h = handles[i % handles.len()];
                            pool.release(h);
                        }
                    }
                    Op::Update(dt) => pool.update(dt),
                }
                assert_disjoint(&pool);
                prop_assert!(pool.active_count() + pool.free_count() <= max);
            }
        }
    }
}
