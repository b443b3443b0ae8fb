mod tests {
    use std::sync::{Arc, Mutex};

    use embassy_time::Duration;
    use printer_light_composer::color::{BLACK, BLUE, WHITE, YELLOW, scale_brightness};
    use printer_light_composer::{
        EffectConfig, EffectEngine, EffectId, EffectSpeed, EffectsSettings, MemoryStrip, NoDelay,
        Pacer, PrinterState, Rgb, StripLog,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const COLOR: Rgb = Rgb {
        r: 200,
        g: 100,
        b: 40,
    };

    /// Records every requested pause instead of sleeping
    #[derive(Clone, Default)]
    struct RecordingPacer {
        pauses: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingPacer {
        fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }
    }

    impl Pacer for RecordingPacer {
        fn pause(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
        }
    }

    fn config(effect: &str, color: Rgb) -> EffectConfig {
        EffectConfig {
            effect: Some(effect.to_owned()),
            color_1: Some(color.into()),
            ..EffectConfig::default()
        }
    }

    fn engine_with<P: Pacer>(
        config: EffectConfig,
        pixels: usize,
        brightness: u8,
        pacer: P,
    ) -> (EffectEngine<MemoryStrip, P>, StripLog) {
        let strip = MemoryStrip::new(pixels);
        let log = strip.log();
        let effects = EffectsSettings {
            standby: config,
            ..EffectsSettings::default()
        };
        let mut engine =
            EffectEngine::new(strip, pacer, brightness, effects).with_rng(StdRng::seed_from_u64(7));
        engine.select(PrinterState::Standby);
        (engine, log)
    }

    fn engine(
        config: EffectConfig,
        pixels: usize,
        brightness: u8,
    ) -> (EffectEngine<MemoryStrip, NoDelay>, StripLog) {
        engine_with(config, pixels, brightness, NoDelay)
    }

    /// Index of the only lit pixel, `None` when the frame is blank
    fn lit(frame: &[Rgb]) -> Option<usize> {
        let mut lit = frame
            .iter()
            .enumerate()
            .filter(|(_, color)| **color != BLACK)
            .map(|(index, _)| index);
        let first = lit.next();
        assert_eq!(lit.next(), None, "more than one pixel lit in {frame:?}");
        first
    }

    /// Last frame of every sweep position
    fn positions(frames: &[Vec<Rgb>], pixels: usize) -> Vec<Vec<Rgb>> {
        frames
            .chunks(pixels)
            .filter(|chunk| chunk.len() == pixels)
            .map(|chunk| chunk[pixels - 1].clone())
            .collect()
    }

    #[test]
    fn test_unknown_effect_falls_back_to_solid() {
        let (engine, _) = engine(config("disco", COLOR), 4, 255);
        assert_eq!(engine.effect(), EffectId::Solid);
    }

    #[test]
    fn test_solid() {
        let pacer = RecordingPacer::default();
        let (mut engine, log) = engine_with(config("solid", COLOR), 4, 128, pacer.clone());
        engine.run_cycle().unwrap();

        assert_eq!(log.brightness_levels(), vec![128]);
        assert_eq!(log.frames(), vec![vec![scale_brightness(COLOR, 128); 4]]);
        assert_eq!(pacer.pauses(), vec![Duration::from_millis(50)]);
    }

    #[test]
    fn test_fade_ramps_up_and_down() {
        let mut config = config("fade", COLOR);
        config.speed = Some(EffectSpeed::Slow);
        let pacer = RecordingPacer::default();
        let (mut engine, log) = engine_with(config, 3, 4, pacer.clone());
        engine.run_cycle().unwrap();

        assert_eq!(log.brightness_levels(), vec![0, 1, 2, 3, 4, 3, 2, 1, 0]);
        let frames = log.frames();
        assert_eq!(frames.len(), 10);
        assert!(frames.iter().all(|frame| frame == &vec![COLOR; 3]));

        let step = Duration::from_millis(10);
        let pauses = pacer.pauses();
        assert_eq!(pauses.len(), 11);
        assert_eq!(pauses[4], step * 5);
        assert_eq!(pauses[10], step * 5);
        assert!(pauses[..4].iter().all(|pause| *pause == step));
    }

    #[test]
    fn test_chase() {
        let (mut engine, log) = engine(config("chase", WHITE), 3, 255);
        engine.run_cycle().unwrap();

        // Every pixel write is flushed, one extra position leaves the strip
        let frames = log.frames();
        assert_eq!(frames.len(), 4 * 3);
        let heads: Vec<_> = positions(&frames, 3).iter().map(|f| lit(f)).collect();
        assert_eq!(heads, vec![Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn test_chase_reverse() {
        let mut config = config("chase", WHITE);
        config.reverse = Some(true);
        let (mut engine, log) = engine(config, 3, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 4 * 3 + 1);
        let heads: Vec<_> = positions(&frames[..12], 3)
            .iter()
            .map(|f| lit(f))
            .collect();
        assert_eq!(heads, vec![None, Some(2), Some(1), Some(0)]);
        assert_eq!(frames.last(), Some(&vec![BLACK; 3]));
    }

    #[test]
    fn test_bounce_goes_there_and_back() {
        let (mut engine, log) = engine(config("bounce", WHITE), 3, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 12 + 13);
        let there: Vec<_> = positions(&frames[..12], 3).iter().map(|f| lit(f)).collect();
        let back: Vec<_> = positions(&frames[12..24], 3)
            .iter()
            .map(|f| lit(f))
            .collect();
        assert_eq!(there, vec![Some(0), Some(1), Some(2), None]);
        assert_eq!(back, vec![None, Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn test_bounce_keeps_direction() {
        let (mut engine, log) = engine(config("bounce", WHITE), 3, 255);
        engine.run_cycle().unwrap();
        let first = log.frames();
        log.clear();

        engine.run_cycle().unwrap();
        assert!(!engine.reverse());
        assert_eq!(log.frames(), first);
    }

    #[test]
    fn test_chase_ghost_trail() {
        let (mut engine, log) = engine(config("chase_ghost", WHITE), 8, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), (8 + 5) * 8);
        let head_at_5 = &positions(&frames, 8)[5];
        let levels: Vec<u8> = head_at_5.iter().map(|color| color.r).collect();
        assert_eq!(levels, vec![0, 0, 63, 127, 191, 255, 0, 0]);
    }

    #[test]
    fn test_chase_ghost_reverse_trail() {
        let mut config = config("chase_ghost", WHITE);
        config.reverse = Some(true);
        let (mut engine, log) = engine(config, 8, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), (8 + 5) * 8 + 1);
        // Positions run 12 down to 0, so position 5 is the eighth
        let head_at_5 = &positions(&frames, 8)[7];
        let levels: Vec<u8> = head_at_5.iter().map(|color| color.r).collect();
        assert_eq!(levels, vec![0, 0, 255, 191, 127, 63, 0, 0]);
        assert_eq!(frames.last(), Some(&vec![BLACK; 8]));
    }

    #[test]
    fn test_ghost_bounce_restores_direction() {
        let (mut engine, log) = engine(config("ghost_bounce", WHITE), 4, 255);
        engine.run_cycle().unwrap();

        assert!(!engine.reverse());
        assert_eq!(log.frames().len(), 2 * (4 + 5) * 4 + 1);
    }

    #[test]
    fn test_fill() {
        let (mut engine, log) = engine(config("fill", COLOR), 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[0], vec![BLACK; 4]);
        assert_eq!(frames[1], vec![COLOR, BLACK, BLACK, BLACK]);
        assert_eq!(frames[4], vec![COLOR; 4]);
    }

    #[test]
    fn test_fill_reverse() {
        let mut config = config("fill", COLOR);
        config.reverse = Some(true);
        let (mut engine, log) = engine(config, 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames[1], vec![BLACK, BLACK, BLACK, COLOR]);
        assert_eq!(frames[2], vec![BLACK, BLACK, COLOR, COLOR]);
    }

    #[test]
    fn test_fill_unfill_clears_backwards() {
        let (mut engine, log) = engine(config("fill_unfill", COLOR), 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 1 + 4 + 4);
        assert_eq!(frames[5], vec![COLOR, COLOR, COLOR, BLACK]);
        assert_eq!(frames[8], vec![BLACK; 4]);
    }

    #[test]
    fn test_fill_chase_clears_forwards() {
        let (mut engine, log) = engine(config("fill_chase", COLOR), 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 1 + 4 + 4);
        assert_eq!(frames[5], vec![BLACK, COLOR, COLOR, COLOR]);
        assert_eq!(frames[8], vec![BLACK; 4]);
    }

    #[test]
    fn test_wave_comb() {
        let (mut engine, log) = engine(config("wave", WHITE), 10, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 10 + 8);

        let levels = |frame: &[Rgb]| frame.iter().map(|color| color.g).collect::<Vec<_>>();
        assert_eq!(
            levels(&frames[0]),
            vec![80, 255, 255, 255, 255, 255, 255, 255, 255, 255]
        );
        assert_eq!(
            levels(&frames[6]),
            vec![80, 60, 40, 20, 40, 60, 80, 255, 255, 255]
        );
        assert_eq!(levels(&frames[17]), vec![255; 10]);
    }

    #[test]
    fn test_slava_ukraini() {
        let (mut engine, log) = engine(config("slava_ukraini", WHITE), 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 4 + 8);
        assert_eq!(frames[11], vec![YELLOW, YELLOW, BLUE, BLUE]);
    }

    #[test]
    fn test_slava_ukraini_reverse_swaps_colors() {
        let mut config = config("slava_ukraini", WHITE);
        config.reverse = Some(true);
        let (mut engine, log) = engine(config, 4, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        // Reversed sweeps start past the far end, outside the comb
        assert_eq!(frames[0], vec![BLUE, BLUE, YELLOW, YELLOW]);
    }

    #[test]
    fn test_twinkle() {
        let (mut engine, log) = engine(config("twinkle", COLOR), 6, 255);
        engine.run_cycle().unwrap();

        // 2 s of 50 ms frames, each followed by a clear
        let frames = log.frames();
        assert_eq!(frames.len(), 1 + 2 * 40);
        for (index, frame) in frames.iter().enumerate() {
            if index % 2 == 1 {
                let lit = lit(frame).unwrap();
                assert_eq!(frame[lit], COLOR);
            } else {
                assert_eq!(frame, &vec![BLACK; 6]);
            }
        }
    }

    #[test]
    fn test_twinkle_speed_sets_frame_count() {
        let mut config = config("twinkle_colors", COLOR);
        config.speed = Some(EffectSpeed::Seconds(0.5));
        let (mut engine, log) = engine(config, 6, 255);
        engine.run_cycle().unwrap();

        assert_eq!(log.frames().len(), 1 + 2 * 4);
    }

    #[test]
    fn test_twinkle_colors_is_seeded() {
        let run = || {
            let (mut engine, log) = engine(config("twinkle_colors", COLOR), 6, 255);
            engine.run_cycle().unwrap();
            log.frames()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_noise() {
        let (mut engine, log) = engine(config("noise", COLOR), 10, 255);
        engine.run_cycle().unwrap();

        let frames = log.frames();
        assert_eq!(frames.len(), 40);
        for pair in frames.windows(2) {
            let changed = pair[0]
                .iter()
                .zip(&pair[1])
                .filter(|(before, after)| before != after)
                .count();
            assert!(changed <= 5);
        }
    }

    #[test]
    fn test_noise_clear_frames() {
        let mut config = config("noise", COLOR);
        config.clear_frames = Some(true);
        let (mut engine, log) = engine(config, 10, 255);
        engine.run_cycle().unwrap();

        for frame in log.frames() {
            assert!(frame.iter().filter(|color| **color != BLACK).count() <= 5);
        }
    }

    #[test]
    fn test_routines_restore_brightness_after_fade() {
        let effects = EffectsSettings {
            standby: config("fade", COLOR),
            paused: config("chase", COLOR),
            ..EffectsSettings::default()
        };
        let strip = MemoryStrip::new(3);
        let log = strip.log();
        let mut engine = EffectEngine::new(strip, NoDelay, 200, effects);

        engine.select(PrinterState::Standby);
        engine.run_cycle().unwrap();
        assert_eq!(engine.strip().brightness(), 0);

        engine.select(PrinterState::Paused);
        log.clear();
        engine.run_cycle().unwrap();
        assert_eq!(log.brightness_levels(), vec![200]);
        assert_eq!(engine.strip().brightness(), 200);
    }

    #[test]
    fn test_brightness_change_keeps_pixel_maps() {
        let (mut engine, log) = engine(config("solid", COLOR), 4, 255);
        let map = engine.pixel_map(PrinterState::Standby).cloned();

        engine.set_brightness(64);
        assert_eq!(engine.brightness(), 64);
        assert_eq!(engine.pixel_map(PrinterState::Standby).cloned(), map);

        engine.run_cycle().unwrap();
        assert_eq!(log.brightness_levels(), vec![64]);
        assert_eq!(log.last_frame().unwrap(), vec![scale_brightness(COLOR, 64); 4]);
    }

    #[test]
    fn test_set_effects_rebuilds_selection() {
        let (mut engine, log) = engine(config("solid", COLOR), 4, 255);
        assert_eq!(engine.effect(), EffectId::Solid);

        engine.set_effects(EffectsSettings {
            standby: config("fill", BLUE),
            ..EffectsSettings::default()
        });
        assert_eq!(engine.state(), PrinterState::Standby);
        assert_eq!(engine.effect(), EffectId::Fill);

        engine.run_cycle().unwrap();
        assert_eq!(log.last_frame().unwrap(), vec![BLUE; 4]);
    }

    #[test]
    fn test_rainbow_pixel_map() {
        let config = EffectConfig {
            effect: Some("solid".to_owned()),
            color_1: Some(printer_light_composer::ColorValue::Token("Rainbow".to_owned())),
            ..EffectConfig::default()
        };
        let (mut engine, log) = engine(config, 10, 255);
        engine.run_cycle().unwrap();

        let frame = log.last_frame().unwrap();
        assert_eq!(frame[0], Rgb::new(255, 0, 0));
        assert_eq!(frame[9], Rgb::new(75, 0, 130));
    }
}
