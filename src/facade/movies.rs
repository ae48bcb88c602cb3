use std::path::PathBuf;

use crate::movie::Movie;

pub fn make_movie() -> Movie {
    Movie::new()
}

pub fn add_frame_to_movie(movie: &mut Movie, frame: impl Into<PathBuf>) {
    movie.add_frame(frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_index_back_in_order() {
        let mut movie = make_movie();
        for i in 0..3 {
            add_frame_to_movie(&mut movie, format!("f{i}.png"));
            assert_eq!(movie.len(), i + 1);
        }
        let names: Vec<_> = movie.iter().map(|p| p.display().to_string()).collect();
        assert_eq!(names, ["f0.png", "f1.png", "f2.png"]);
    }
}
