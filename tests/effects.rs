mod tests {
    use embassy_time::Instant;
    use duo_strip::{
        color::Rgb,
        effect::{
            COLD_WHITE_KELVIN, EFFECT_COUNT, Effect, EffectId, EffectRegistry, FireEffect,
            OCEAN_BRIGHTNESS_CEILING, OceanEffect, PoliceChaseEffect, RainbowEffect,
            RenderContext, StaticColorEffect, WARM_WHITE_KELVIN,
        },
    };

    fn ctx(ms: u64) -> RenderContext {
        RenderContext::new(Instant::from_millis(ms), false, 255)
    }

    fn is_mirrored(leds: &[Rgb]) -> bool {
        let len = leds.len();
        (0..len / 2).all(|i| leds[i] == leds[len - 1 - i])
    }

    #[test]
    fn test_registry_order() {
        assert_eq!(EFFECT_COUNT, 6);
        let registry = EffectRegistry::<10>::new(1);
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.current(), EffectId::Fire);
        assert_eq!(
            EffectId::ALL,
            [
                EffectId::Fire,
                EffectId::PoliceChase,
                EffectId::Rainbow,
                EffectId::Ocean,
                EffectId::ColdWhite,
                EffectId::WarmWhite,
            ]
        );
        assert_eq!(EffectId::from_raw(3), Some(EffectId::Ocean));
        assert_eq!(EffectId::from_raw(6), None);
        assert_eq!(EffectId::WarmWhite.as_str(), "warm_white");
    }

    #[test]
    fn test_cycling_closes_after_full_turn() {
        let mut registry = EffectRegistry::<10>::new(1);
        for start in 0..EFFECT_COUNT {
            registry.select(start);
            for _ in 0..EFFECT_COUNT {
                registry.next();
            }
            assert_eq!(registry.index(), start);
            for _ in 0..EFFECT_COUNT {
                registry.previous();
            }
            assert_eq!(registry.index(), start);
        }
    }

    #[test]
    fn test_cycling_wraps() {
        let mut registry = EffectRegistry::<10>::new(1);
        assert_eq!(registry.previous(), EffectId::WarmWhite);
        assert_eq!(registry.next(), EffectId::Fire);
        assert_eq!(registry.select(13), EffectId::PoliceChase);
    }

    #[test]
    fn test_fire_stays_mirrored_for_many_seeds() {
        for seed in 0..32 {
            let mut fire = FireEffect::<41>::new(seed);
            let mut leds = [Rgb::default(); 41];
            for frame in 0..300 {
                fire.render(&mut ctx(frame * 30), &mut leds);
            }
            assert_eq!(fire.heat().len(), 21);
            assert!(is_mirrored(&leds), "seed {seed}");
        }
    }

    #[test]
    fn test_fire_is_throttled() {
        let mut fire = FireEffect::<20>::new(9);
        let mut leds = [Rgb::default(); 20];
        fire.render(&mut ctx(0), &mut leds);
        let heat: Vec<u8> = fire.heat().to_vec();
        fire.render(&mut ctx(10), &mut leds);
        assert_eq!(fire.heat(), heat.as_slice());
    }

    #[test]
    fn test_fire_on_tiny_strips() {
        let mut one = FireEffect::<1>::new(3);
        let mut leds = [Rgb::default(); 1];
        for frame in 0..50 {
            one.render(&mut ctx(frame * 30), &mut leds);
        }
        let mut empty = FireEffect::<0>::new(3);
        empty.render(&mut ctx(0), &mut []);
    }

    #[test]
    fn test_police_chase_moves_inward() {
        let mut police = PoliceChaseEffect::new();
        let mut leds = [Rgb::default(); 8];

        police.render(&mut ctx(0), &mut leds);
        assert_eq!(leds[0], Rgb::new(128, 0, 0));
        assert_eq!(leds[7], Rgb::new(0, 0, 127));

        police.render(&mut ctx(10), &mut leds);
        assert_eq!(leds[1], Rgb::default());

        police.render(&mut ctx(20), &mut leds);
        assert_eq!(leds[1], Rgb::new(128, 0, 0));
        assert_eq!(leds[6], Rgb::new(0, 0, 127));
        assert_eq!(leds[0], Rgb::new(255, 0, 0));
        assert_eq!(leds[7], Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_rainbow_is_mirrored() {
        let mut rainbow = RainbowEffect::new();
        let mut leds = [Rgb::default(); 9];
        rainbow.render(&mut ctx(1000), &mut leds);
        assert!(is_mirrored(&leds));
        assert_ne!(leds[0], leds[1]);
        assert_eq!(rainbow.base_hue(40), 2);
        assert_eq!(rainbow.base_hue(20 * 256), 0);
    }

    #[test]
    fn test_ocean_lowers_ceiling_once() {
        let mut ocean = OceanEffect::new();
        let mut leds = [Rgb::default(); 30];

        let mut first = ctx(0);
        ocean.render(&mut first, &mut leds);
        assert_eq!(first.brightness_ceiling, OCEAN_BRIGHTNESS_CEILING);
        assert!(leds.iter().all(|led| led.b & 0x04 != 0 && led.g & 0x01 != 0));

        let mut second = ctx(20);
        ocean.render(&mut second, &mut leds);
        assert_eq!(second.brightness_ceiling, 255);
        assert!(ocean.phases().iter().any(|phase| *phase != 0.0));
    }

    #[test]
    fn test_static_color_fills_on_state_change_only() {
        let mut white = StaticColorEffect::from_kelvin(COLD_WHITE_KELVIN);
        let mut leds = [Rgb::default(); 5];

        white.render(&mut ctx(0), &mut leds);
        assert!(leds.iter().all(|led| *led == Rgb::default()));

        let mut changed = RenderContext::new(Instant::from_millis(0), true, 255);
        white.render(&mut changed, &mut leds);
        assert!(leds.iter().all(|led| *led == white.color()));

        leds[2] = Rgb::new(1, 1, 1);
        white.render(&mut ctx(10), &mut leds);
        assert_eq!(leds[2], Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_whites_differ() {
        let cold = StaticColorEffect::from_kelvin(COLD_WHITE_KELVIN);
        let warm = StaticColorEffect::from_kelvin(WARM_WHITE_KELVIN);
        assert!(warm.color().b < cold.color().b);
    }
}
