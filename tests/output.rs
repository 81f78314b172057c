mod tests {
    use embassy_time::{Duration, Instant};
    use duo_strip::{
        OutputDriver,
        color::Rgb,
        filter::{BrightnessRange, OutputStage, PowerLimiter},
        output::SmartLedsOutput,
    };
    use smart_leds::SmartLedsWrite;

    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_brightness_range_clamps() {
        let range = BrightnessRange::new(10, 255);
        assert_eq!(range.clamp(0), 10);
        assert_eq!(range.step_down(11, 5), 10);
        assert_eq!(range.step_up(254, 5), 255);

        let mut value = 128;
        for _ in 0..300 {
            value = range.step_down(value, 1);
            assert!(value >= range.floor());
        }
        assert_eq!(value, 10);
        for _ in 0..300 {
            value = range.step_up(value, 1);
        }
        assert_eq!(value, 255);
    }

    #[test]
    fn test_lowered_ceiling_is_one_way() {
        let mut range = BrightnessRange::new(10, 255);
        range.lower_ceiling(160);
        assert_eq!(range.ceiling(), 160);
        range.lower_ceiling(200);
        assert_eq!(range.ceiling(), 160);
        assert_eq!(range.clamp(255), 160);

        range.lower_ceiling(5);
        assert_eq!(range.floor(), 5);
        assert_eq!(BrightnessRange::new(50, 20).floor(), 20);
    }

    #[test]
    fn test_stage_scales_copy_only() {
        let mut stage = OutputStage::<4>::new(128, u32::MAX);
        let leds = [WHITE; 4];
        let frame = stage.process(&leds, Instant::from_millis(0));
        assert!(frame.iter().all(|led| *led == Rgb::new(128, 128, 128)));
        assert_eq!(leds, [WHITE; 4]);
    }

    #[test]
    fn test_stage_brightness_fade() {
        let mut stage = OutputStage::<1>::new(0, u32::MAX);
        stage
            .brightness
            .set(200, Duration::from_millis(100), Instant::from_millis(0));
        let frame = stage.process(&[WHITE], Instant::from_millis(50));
        assert!(frame[0].r > 0 && frame[0].r < 200);
        let frame = stage.process(&[WHITE], Instant::from_millis(100));
        assert_eq!(frame[0].r, scale(255, 200));
        assert!(!stage.brightness.is_transitioning());
    }

    fn scale(value: u8, level: u8) -> u8 {
        duo_strip::math8::scale8(value, level)
    }

    #[test]
    fn test_power_limiter() {
        let frame = [WHITE; 100];
        let full = PowerLimiter::full_power_mw(&frame);
        assert_eq!(full, (255 * (80 + 55 + 75) * 100 >> 8) + 500);

        let limiter = PowerLimiter::new(full / 2);
        let level = limiter.limit(&frame, 255);
        assert!(level < 255);
        assert!(full * u32::from(level) / 256 <= full / 2);

        assert_eq!(PowerLimiter::new(u32::MAX).limit(&frame, 255), 255);
        assert_eq!(limiter.limit(&[Rgb::default(); 100], 255), 255);
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<Rgb>>,
    }

    impl SmartLedsWrite for Recorder {
        type Error = ();
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            self.frames.push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }

    #[test]
    fn test_smart_leds_adapter() {
        let mut output = SmartLedsOutput(Recorder::default());
        output.write(&[WHITE, Rgb::default()]);

        let mut stage = OutputStage::<2>::new(255, u32::MAX);
        stage.flush(&mut output, &[Rgb::new(1, 2, 3); 2], Instant::from_millis(0));

        assert_eq!(output.0.frames.len(), 2);
        assert_eq!(output.0.frames[0], vec![WHITE, Rgb::default()]);
        assert_eq!(output.0.frames[1], vec![Rgb::new(1, 2, 3); 2]);
    }
}
