mod tests {
    use embassy_time::{Duration, Instant};
    use duo_strip::{
        button::{GestureClassifier, HoldThresholds},
        filter::BrightnessRange,
        persistence::{
            BRIGHTNESS_ADDRESS, ConfigStorage, EFFECT_INDEX_ADDRESS, EmbeddedStorage,
            PersistenceError, PersistenceGate, PersistentConfig,
        },
    };

    const RANGE: BrightnessRange = BrightnessRange::new(10, 255);
    const EFFECTS: usize = 6;
    const SETTLE: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct MemoryStorage {
        bytes: [u8; 2],
        writes: usize,
        broken: bool,
    }

    impl ConfigStorage for MemoryStorage {
        type Error = ();

        fn read(&mut self, address: u8) -> Result<u8, Self::Error> {
            if self.broken {
                return Err(());
            }
            Ok(self.bytes[usize::from(address)])
        }

        fn write(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
            if self.broken {
                return Err(());
            }
            self.writes += 1;
            self.bytes[usize::from(address)] = value;
            Ok(())
        }
    }

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(
            HoldThresholds {
                long_press: Duration::from_millis(600),
                extra_long: None,
            },
            Instant::from_millis(0),
        )
    }

    #[test]
    fn test_round_trip() {
        let mut storage = MemoryStorage::default();
        let config = PersistentConfig {
            effect_index: 4,
            brightness: 77,
        };
        config.save(&mut storage).unwrap();
        assert_eq!(storage.bytes[usize::from(EFFECT_INDEX_ADDRESS)], 4);
        assert_eq!(storage.bytes[usize::from(BRIGHTNESS_ADDRESS)], 77);
        assert_eq!(PersistentConfig::load(&mut storage, EFFECTS, RANGE), Ok(config));
    }

    #[test]
    fn test_corrupt_index_loads_modulo() {
        let mut storage = MemoryStorage {
            bytes: [200, 5],
            ..Default::default()
        };
        let config = PersistentConfig::load(&mut storage, EFFECTS, RANGE).unwrap();
        assert_eq!(config.effect_index, 200 % 6);
        assert_eq!(config.brightness, 10);
    }

    #[test]
    fn test_save_skips_unchanged_bytes() {
        let mut storage = MemoryStorage::default();
        let config = PersistentConfig {
            effect_index: 1,
            brightness: 128,
        };
        config.save(&mut storage).unwrap();
        assert_eq!(storage.writes, 2);
        config.save(&mut storage).unwrap();
        assert_eq!(storage.writes, 2);
        PersistentConfig {
            brightness: 129,
            ..config
        }
        .save(&mut storage)
        .unwrap();
        assert_eq!(storage.writes, 3);
    }

    #[test]
    fn test_driver_failure() {
        let mut storage = MemoryStorage {
            broken: true,
            ..Default::default()
        };
        assert_eq!(
            PersistentConfig::load(&mut storage, EFFECTS, RANGE),
            Err(PersistenceError::Driver)
        );
    }

    #[test]
    fn test_gate_waits_for_settle() {
        let mut storage = MemoryStorage::default();
        let mut gate = PersistenceGate::new(SETTLE);
        let first = classifier();
        let mut second = classifier();
        let config = PersistentConfig {
            effect_index: 3,
            brightness: 90,
        };

        // Nothing pending, nothing written
        let now = Instant::from_millis(10_000);
        assert_eq!(gate.poll(&mut storage, config, [&first, &second], now), Ok(false));

        second.poll(true, Instant::from_millis(10_000));
        second.poll(false, Instant::from_millis(10_100));
        gate.mark_dirty();

        let early = Instant::from_millis(14_000);
        assert!(!gate.is_settled([&first, &second], early));
        assert_eq!(gate.poll(&mut storage, config, [&first, &second], early), Ok(false));
        assert!(gate.is_pending());

        let settled = Instant::from_millis(15_100);
        assert_eq!(gate.poll(&mut storage, config, [&first, &second], settled), Ok(true));
        assert!(!gate.is_pending());
        assert_eq!(storage.bytes, [3, 90]);
    }

    #[test]
    fn test_gate_blocks_while_held() {
        let mut storage = MemoryStorage::default();
        let mut gate = PersistenceGate::new(SETTLE);
        let mut first = classifier();
        let second = classifier();
        first.poll(true, Instant::from_millis(0));
        gate.mark_dirty();

        let config = PersistentConfig {
            effect_index: 2,
            brightness: 50,
        };
        let now = Instant::from_millis(60_000);
        assert_eq!(gate.poll(&mut storage, config, [&first, &second], now), Ok(false));
        assert_eq!(storage.writes, 0);
    }

    #[test]
    fn test_gate_clears_flag_on_failure() {
        let mut storage = MemoryStorage {
            broken: true,
            ..Default::default()
        };
        let mut gate = PersistenceGate::new(SETTLE);
        let buttons = [classifier(), classifier()];
        gate.mark_dirty();

        let config = PersistentConfig {
            effect_index: 0,
            brightness: 10,
        };
        let now = Instant::from_millis(6_000);
        assert_eq!(
            gate.poll(&mut storage, config, [&buttons[0], &buttons[1]], now),
            Err(PersistenceError::Driver)
        );
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_discard_drops_pending_change() {
        let mut gate = PersistenceGate::new(SETTLE);
        gate.mark_dirty();
        gate.discard();
        assert!(!gate.is_pending());
    }

    struct Eeprom {
        data: [u8; 16],
    }

    impl embedded_storage::ReadStorage for Eeprom {
        type Error = ();

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.data.len()
        }
    }

    impl embedded_storage::Storage for Eeprom {
        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            self.data[start..start + bytes.len()].copy_from_slice(bytes);
            Ok(())
        }
    }

    #[test]
    fn test_embedded_storage_adapter() {
        let mut storage = EmbeddedStorage(Eeprom { data: [0xFF; 16] });
        let loaded = PersistentConfig::load(&mut storage, EFFECTS, RANGE).unwrap();
        assert_eq!(loaded.effect_index, 255 % 6);
        assert_eq!(loaded.brightness, 255);

        PersistentConfig {
            effect_index: 5,
            brightness: 42,
        }
        .save(&mut storage)
        .unwrap();
        assert_eq!(&storage.0.data[..2], &[5, 42]);
    }
}
