mod tests {
    use duo_strip::power::WakeLatch;

    #[test]
    fn test_signal_ignored_until_armed() {
        let latch = WakeLatch::new();
        assert!(!latch.is_armed());
        assert!(!latch.signal());
        assert!(!latch.take());
    }

    #[test]
    fn test_signal_fires_once_per_arm() {
        let latch = WakeLatch::new();
        latch.arm();
        assert!(latch.is_armed());
        assert!(latch.signal());
        assert!(!latch.is_armed());
        assert!(!latch.signal());
        assert!(latch.take());
        assert!(!latch.take());
    }

    #[test]
    fn test_disarm_and_rearm() {
        static LATCH: WakeLatch = WakeLatch::new();
        LATCH.arm();
        LATCH.disarm();
        assert!(!LATCH.signal());

        LATCH.arm();
        assert!(LATCH.signal());
        LATCH.arm();
        assert!(!LATCH.take());
    }
}
