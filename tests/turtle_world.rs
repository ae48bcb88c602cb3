use mediacomp::facade::*;
use mediacomp::{Color, Pixel as _};

#[test]
fn world_turtles_draw_a_square() {
    let mut world = make_world(Some(200), Some(200)).unwrap();
    let id = make_turtle_in_world(&mut world);
    {
        let (t, canvas) = world.split_mut(id).unwrap();
        assert_eq!((get_x_pos(t), get_y_pos(t), get_heading(t)), (100, 100, 0.0));
        for _ in 0..4 {
            forward(t, canvas, 50.0).unwrap();
            turn_right(t);
        }
        assert_eq!((get_x_pos(t), get_y_pos(t)), (100, 100));
        assert_eq!(get_heading(t), 0.0);
    }
    let pic = world.picture();
    // Up the left edge, then along the top.
    assert_eq!(get_color(&get_pixel(pic, 101, 76).unwrap()), Color::BLACK);
    assert_eq!(get_color(&get_pixel(pic, 126, 51).unwrap()), Color::BLACK);
    assert_eq!(get_color(&get_pixel(pic, 126, 76).unwrap()), Color::WHITE);
}

#[test]
fn pen_up_moves_without_drawing() {
    let mut canvas = make_empty_picture(60, 60, Color::WHITE).unwrap();
    let mut t = make_turtle_on_picture(&canvas);
    pen_up(&mut t);
    move_to(&mut t, &mut canvas, 10, 10).unwrap();
    backward(&mut t, &mut canvas, 5.0).unwrap();
    assert_eq!((get_x_pos(&t), get_y_pos(&t)), (10, 15));
    assert!(canvas.pixels().all(|p| p.color() == Color::WHITE));

    pen_down(&mut t);
    turn_left(&mut t);
    forward(&mut t, &mut canvas, 8.0).unwrap();
    assert_eq!((get_x_pos(&t), get_y_pos(&t)), (2, 15));
    assert_eq!(get_color(&get_pixel(&canvas, 7, 16).unwrap()), Color::BLACK);
}

#[test]
fn turtles_can_face_points_and_each_other() {
    let mut world = make_world(None, None).unwrap();
    assert_eq!((world.width(), world.height()), (640, 480));
    let a = make_turtle_in_world(&mut world);
    let b = make_turtle_in_world(&mut world);
    assert_eq!(get_turtle_list(&world).len(), 2);

    {
        let (tb, canvas) = world.split_mut(b).unwrap();
        pen_up(tb);
        move_to(tb, canvas, 320, 100).unwrap();
    }
    let other = *world.turtle(b).unwrap();
    let ta = world.turtle_mut(a).unwrap();
    turn(ta, 45.0);
    turn_to_face_turtle(ta, &other);
    assert_eq!(get_heading(ta), 0.0);
    turn_to_face(ta, 0, 240);
    assert!((get_heading(ta) + 90.0).abs() < 1e-9);
}

#[test]
fn dropped_pictures_land_at_the_turtle() {
    let mut canvas = make_empty_picture(40, 40, Color::WHITE).unwrap();
    let stamp = make_empty_picture(4, 4, Color::YELLOW).unwrap();
    let t = make_turtle_on_picture(&canvas);
    drop(&t, &mut canvas, &stamp);
    assert_eq!(get_color(&get_pixel(&canvas, 21, 21).unwrap()), Color::YELLOW);
    assert_eq!(get_color(&get_pixel(&canvas, 24, 24).unwrap()), Color::YELLOW);
    assert_eq!(get_color(&get_pixel(&canvas, 25, 21).unwrap()), Color::WHITE);
}
