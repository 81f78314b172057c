mod tests {
    use duo_strip::color::{
        Palette, Rgb, add_colors, blend_colors, heat_color, kelvin_to_rgb, mirror_half,
        rgb_from_u32,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(RED, BLUE, 0), RED);
        assert_eq!(blend_colors(RED, BLUE, 255), BLUE);
        assert_eq!(
            blend_colors(RED, BLUE, 128),
            Rgb {
                r: 127,
                g: 0,
                b: 128
            }
        );

        assert_eq!(
            blend_colors(BLACK, WHITE, 128),
            Rgb {
                r: 128,
                g: 128,
                b: 128
            }
        );
        assert_eq!(blend_colors(WHITE, BLACK, 255), BLACK);
        assert_eq!(blend_colors(WHITE, BLACK, 0), WHITE);
    }

    #[test]
    fn test_add_colors_saturates() {
        assert_eq!(add_colors(WHITE, RED), WHITE);
        assert_eq!(
            add_colors(Rgb { r: 200, g: 10, b: 0 }, Rgb { r: 100, g: 10, b: 5 }),
            Rgb { r: 255, g: 20, b: 5 }
        );
    }

    #[test]
    fn test_mirror_half() {
        let mut leds = [RED; 4];
        mirror_half(&mut leds);
        assert_eq!(leds, [RED, RED, RED, RED]);

        leds[0] = BLUE;
        leds[1] = WHITE;
        mirror_half(&mut leds);
        assert_eq!(leds, [BLUE, WHITE, WHITE, BLUE]);

        let mut leds = [BLUE, WHITE, RED, RED, RED];
        mirror_half(&mut leds);
        assert_eq!(leds, [BLUE, WHITE, RED, WHITE, BLUE]);
    }

    #[test]
    fn test_heat_color_ramp() {
        assert_eq!(heat_color(0), BLACK);
        assert_eq!(heat_color(128), Rgb { r: 255, g: 128, b: 0 });
        assert_eq!(heat_color(255), Rgb { r: 255, g: 255, b: 252 });
    }

    #[test]
    fn test_heat_color_never_darker_when_hotter() {
        for heat in 0..255u8 {
            let cool = heat_color(heat);
            let hot = heat_color(heat + 1);
            assert!(hot.r >= cool.r, "red dropped at {heat}");
        }
    }

    #[test]
    fn test_kelvin_whites() {
        let warm = kelvin_to_rgb(2700);
        let cold = kelvin_to_rgb(6500);
        assert_eq!(warm.r, 255);
        assert_eq!(cold.r, 255);
        assert!(warm.g < cold.g);
        assert!(warm.b < cold.b);
        assert!(cold.b > 200);
    }

    #[test]
    fn test_kelvin_clamps_range() {
        assert_eq!(kelvin_to_rgb(500), kelvin_to_rgb(1000));
        assert_eq!(kelvin_to_rgb(1000).b, 0);
        assert_eq!(kelvin_to_rgb(40000).b, 255);
    }

    #[test]
    fn test_palette_sample_endpoints() {
        let palette = Palette::new([BLACK, BLUE, WHITE]);
        assert_eq!(palette.sample(0), BLACK);
        let top = palette.sample(255);
        assert!(top.r >= 250 && top.g >= 250 && top.b == 255);
    }

    #[test]
    fn test_rgb_from_u32() {
        assert_eq!(rgb_from_u32(0x00_01_04), Rgb { r: 0, g: 1, b: 4 });
    }
}
