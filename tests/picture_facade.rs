use std::path::Path;

use mediacomp::facade::*;
use mediacomp::{Color, MediaConfig, MediaError, MediaSession, Pixel as _};

fn session_in(dir: &Path) -> MediaSession {
    MediaSession::new(MediaConfig {
        media_folder: Some(dir.to_path_buf()),
        ..MediaConfig::default()
    })
}

#[test]
fn empty_picture_is_uniform() {
    for (w, h) in [(1, 1), (7, 3), (40, 25)] {
        let pic = make_empty_picture(w, h, Color::PINK).unwrap();
        assert_eq!((get_width(&pic), get_height(&pic)), (w as u32, h as u32));
        assert!(get_pixels(&pic).iter().all(|p| get_color(p) == Color::PINK));
    }
}

#[test]
fn pixel_access_is_bounded_on_every_side() {
    let mut pic = make_empty_picture(5, 4, Color::WHITE).unwrap();
    for (x, y) in [(0, 1), (6, 1), (1, 0), (1, 5)] {
        let err = get_pixel(&pic, x, y).unwrap_err();
        assert!(matches!(err, MediaError::OutOfRange(_)), "({x}, {y})");
    }
    for y in 1..=4 {
        for x in 1..=5 {
            let c = make_color(x * 40, y * 50, 7);
            set_color(&mut get_pixel_mut(&mut pic, x, y).unwrap(), c);
            assert_eq!(get_color(&get_pixel_at(&pic, x, y).unwrap()), c);
        }
    }
}

#[test]
fn out_of_range_message_reports_the_bounds() {
    let pic = make_empty_picture(10, 7, Color::WHITE).unwrap();
    let msg = get_pixel(&pic, 3, 42).unwrap_err().to_string();
    assert!(msg.contains("y (= 42)"), "{msg}");
    assert!(msg.contains("height (= 7)"), "{msg}");
}

#[test]
fn channel_writes_follow_the_session_policy() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    let mut pic = make_empty_picture(2, 2, Color::BLACK).unwrap();

    assert!(!session.get_color_wrap_around());
    let mut px = get_pixel_mut(&mut pic, 1, 1).unwrap();
    session.set_red(&mut px, 300);
    session.set_green(&mut px, -20);
    assert_eq!((get_red(&px), get_green(&px)), (255, 0));

    session.set_color_wrap_around(true);
    session.set_red(&mut px, 300);
    session.set_blue(&mut px, -1);
    assert_eq!((get_red(&px), get_blue(&px)), (44, 255));
}

#[test]
fn pictures_round_trip_through_the_media_folder() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let mut pic = make_empty_picture(6, 4, Color::WHITE).unwrap();
    add_rect_filled(&mut pic, 0, 0, 3, 2, Color::BLUE).unwrap();
    session.write_picture_to(&pic, Path::new("boxes.png")).unwrap();
    assert!(dir.path().join("boxes.png").is_file());

    let back = session.make_picture(Path::new("boxes.png")).unwrap();
    assert_eq!((back.width(), back.height()), (6, 4));
    assert_eq!(get_color(&get_pixel(&back, 1, 1).unwrap()), Color::BLUE);
    assert_eq!(get_color(&get_pixel(&back, 4, 1).unwrap()), Color::WHITE);
    assert!(back.title().ends_with("boxes.png"));
}

#[test]
fn missing_and_unknown_files_are_argument_errors() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let err = session.make_picture(Path::new("nope.png")).unwrap_err();
    assert!(matches!(err, MediaError::MissingFile(_)));
    assert!(err.to_string().contains("make_picture(filename)"));

    let pic = make_empty_picture(2, 2, Color::WHITE).unwrap();
    let err = session
        .write_picture_to(&pic, Path::new("picture.unknown"))
        .unwrap_err();
    assert!(matches!(err, MediaError::Unsupported(_)));
    assert!(err.is_invalid_argument());
}

#[test]
fn drawing_and_copying_compose() {
    let mut canvas = make_empty_picture(20, 20, Color::WHITE).unwrap();
    add_line(&mut canvas, 0, 10, 19, 10, Color::RED).unwrap();
    assert_eq!(get_color(&get_pixel(&canvas, 10, 11).unwrap()), Color::RED);

    let stamp = make_empty_picture(3, 3, Color::GREEN).unwrap();
    copy_into(&stamp, &mut canvas, 19, 19).unwrap();
    assert_eq!(get_color(&get_pixel(&canvas, 20, 20).unwrap()), Color::GREEN);

    let corner = crop_picture(&canvas, 18, 18, 5, 5).unwrap();
    assert_eq!((get_width(&corner), get_height(&corner)), (3, 3));

    let copy = duplicate_picture(&canvas);
    set_all_pixels_to_a_color(&mut canvas, Color::BLACK);
    assert_eq!(get_color(&get_pixel(&copy, 20, 20).unwrap()), Color::GREEN);
    assert!(get_all_pixels(&canvas).iter().all(|p| p.color() == Color::BLACK));
}

#[test]
fn colors_shade_by_a_fixed_factor() {
    assert_eq!(make_darker(Color::new(100, 200, 10)), Color::new(70, 140, 7));
    assert_eq!(make_brighter(Color::BLACK), Color::new(3, 3, 3));
    assert_eq!(distance(Color::WHITE, Color::WHITE), 0.0);
}
