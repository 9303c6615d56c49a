use image::Rgba;
use lingxian::bitmap::{self, BitmapRef};
use lingxian::generation::DEFAULT_GENERATION_DELAY;
use lingxian::{AiStyle, FilterRegistry, GenerationMode, GenerationPreview, Generator};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn sketch() -> BitmapRef {
    let mut image = bitmap::filled(32, 32, bitmap::WHITE);
    for x in 4..28 {
        for y in 14..18 {
            image.put_pixel(x, y, Rgba([20, 20, 200, 255]));
        }
    }
    Arc::new(image)
}

#[test]
fn test_cartoon_output_arrives_after_delay() {
    let mut preview = GenerationPreview::new(Generator::default());
    let input = sketch();
    let start = Instant::now();

    assert!(preview.request(input.clone(), AiStyle::Cartoon, "", start));
    assert!(preview.is_generating());
    assert!(preview.poll(start + Duration::from_millis(100)).is_none());

    let output = preview.poll(start + DEFAULT_GENERATION_DELAY).unwrap();
    assert!(!preview.is_generating());
    assert_eq!(output.dimensions(), input.dimensions());
    assert_ne!(output.as_ref(), input.as_ref());
    assert!(Arc::ptr_eq(preview.output().unwrap(), &output));
}

#[test]
fn test_missing_filter_returns_input_unchanged() {
    let filters = FilterRegistry::builtin().without(AiStyle::Cartoon.filter_name());
    let generator = Generator::new(GenerationMode::Filter, Duration::ZERO).with_filters(filters);
    let mut preview = GenerationPreview::new(generator);
    let input = sketch();
    let now = Instant::now();

    preview.request(input.clone(), AiStyle::Cartoon, "", now);
    let output = preview.poll(now).unwrap();

    assert_eq!(output.as_ref(), input.as_ref());
}

#[test]
fn test_request_while_in_flight_is_dropped() {
    let mut preview = GenerationPreview::new(Generator::default());
    let start = Instant::now();

    assert!(preview.request(sketch(), AiStyle::Sketch, "", start));
    assert!(!preview.request(sketch(), AiStyle::Anime, "", start + Duration::from_millis(10)));

    let done = start + Duration::from_secs(10);
    assert!(preview.poll(done).is_some());
    assert!(preview.poll(done).is_none());
    assert_eq!(preview.completed(), 1);
}

#[test]
fn test_observe_triggers_on_identity_style_and_prompt() {
    let mut preview = GenerationPreview::new(Generator::new(GenerationMode::Echo, Duration::ZERO));
    let now = Instant::now();
    let input = sketch();

    assert!(preview.observe(Some(&input), AiStyle::Realistic, "", now));
    preview.poll(now);

    // Same Arc, same settings: nothing to do
    assert!(!preview.observe(Some(&input), AiStyle::Realistic, "", now));

    // Equal pixels but a new bitmap still counts as a change
    let copy = Arc::new(input.as_ref().clone());
    assert!(preview.observe(Some(&copy), AiStyle::Realistic, "", now));
    preview.poll(now);

    assert!(preview.observe(Some(&copy), AiStyle::Watercolor, "", now));
    preview.poll(now);

    assert!(preview.observe(Some(&copy), AiStyle::Watercolor, "a lake", now));
    preview.poll(now);

    assert_eq!(preview.completed(), 4);
}

#[test]
fn test_change_during_flight_is_not_queued() {
    let mut preview = GenerationPreview::new(Generator::default());
    let start = Instant::now();
    let input = sketch();

    assert!(preview.observe(Some(&input), AiStyle::Realistic, "", start));
    assert!(!preview.observe(Some(&input), AiStyle::Anime, "", start));

    preview.poll(start + DEFAULT_GENERATION_DELAY);
    assert!(!preview.is_generating());
    assert!(preview.poll(start + DEFAULT_GENERATION_DELAY * 3).is_none());
}

#[test]
fn test_echo_mode_hands_back_the_input() {
    let mut preview = GenerationPreview::new(Generator::new(GenerationMode::Echo, Duration::ZERO));
    let input = sketch();
    let now = Instant::now();
    preview.request(input.clone(), AiStyle::OilPainting, "ignored", now);
    assert!(Arc::ptr_eq(&preview.poll(now).unwrap(), &input));
}
