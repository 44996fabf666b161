use super::*;

fn args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn value_after<'a>(args: &'a [String], flag: &str) -> &'a str {
    let i = args
        .iter()
        .position(|a| a == flag)
        .unwrap_or_else(|| panic!("missing {flag} in {args:?}"));
    &args[i + 1]
}

fn opts() -> StitchOpts {
    StitchOpts::new(
        "out/images",
        OutputFormat::Png,
        FrameRange::from_bounds(1, 250),
        Fps::new(24, 1).unwrap(),
        "out/shot.mp4",
    )
}

#[test]
fn frame_count_includes_the_last_frame() {
    let a = args(&stitch_command(&opts()));
    assert_eq!(value_after(&a, "-frames:v"), "250");
    assert_eq!(value_after(&a, "-start_number"), "1");
    assert_eq!(value_after(&a, "-framerate"), "24");
}

#[test]
fn input_pattern_uses_the_sequence_extension() {
    let mut o = opts();
    o.format = OutputFormat::Jpeg;
    let a = args(&stitch_command(&o));
    let pattern = PathBuf::from(value_after(&a, "-i"));
    assert_eq!(pattern, Path::new("out/images").join("%d.jpg"));
    assert_eq!(a.last().map(String::as_str), Some("out/shot.mp4"));
}

#[test]
fn audio_adds_a_second_input_and_codec() {
    let mut o = opts();
    o.audio = Some(PathBuf::from("mix.flac"));
    let a = args(&stitch_command(&o));
    assert_eq!(a.iter().filter(|x| *x == "-i").count(), 2);
    assert!(a.iter().any(|x| x == "mix.flac"));
    assert_eq!(value_after(&a, "-c:a"), "aac");

    let silent = args(&stitch_command(&opts()));
    assert!(!silent.iter().any(|x| x == "-c:a"));
}

#[test]
fn overwrite_flag_selects_y_or_n() {
    let mut o = opts();
    assert_eq!(args(&stitch_command(&o))[0], "-y");
    o.overwrite = false;
    assert_eq!(args(&stitch_command(&o))[0], "-n");
}

#[test]
fn fractional_rates_are_passed_as_ratios() {
    let mut o = opts();
    o.fps = Fps::new(30000, 1001).unwrap();
    let a = args(&stitch_command(&o));
    assert_eq!(value_after(&a, "-framerate"), "30000/1001");
}

#[test]
fn empty_or_negative_ranges_are_rejected() {
    let mut o = opts();
    o.range = FrameRange::from_bounds(5, 3);
    assert!(matches!(stitch(&o), Err(HoldError::Validation(_))));
    o.range = FrameRange::from_bounds(-2, 3);
    assert!(matches!(stitch(&o), Err(HoldError::Validation(_))));
}

#[test]
fn missing_audio_is_a_configuration_error() {
    let mut o = opts();
    o.audio = Some(PathBuf::from("target/unit_ffmpeg/definitely-missing.flac"));
    assert!(matches!(stitch(&o), Err(HoldError::Configuration(_))));
}
