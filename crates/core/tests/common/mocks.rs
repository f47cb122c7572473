use mockall::mock;
use ossim_core::common::RandomSource;

mock! {
    pub Rng {}
    impl RandomSource for Rng {
        fn next_u64(&mut self) -> u64;
    }
}
