use crate::components::Viewport;

/// Parse a camera viewport written as `"x,y,width,height"`.
///
/// Exactly four comma-separated integers are accepted, each optionally
/// surrounded by whitespace. Anything else yields `None`.
pub fn parse_viewport(value: &str) -> Option<Viewport> {
    let mut parts = [0_i32; 4];
    let mut tokens = value.split(',');
    for part in &mut parts {
        *part = tokens.next()?.trim().parse().ok()?;
    }
    if tokens.next().is_some() {
        return None;
    }
    let [x, y, width, height] = parts;
    Some(Viewport::new(x, y, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_integers() {
        assert_eq!(parse_viewport("10,20,300,400"), Some(Viewport::new(10, 20, 300, 400)));
        assert_eq!(parse_viewport(" 0, -5 ,640, 480 "), Some(Viewport::new(0, -5, 640, 480)));
    }

    #[test]
    fn test_malformed_viewports() {
        assert_eq!(parse_viewport("10,20,300"), None);
        assert_eq!(parse_viewport("10,20,300,400,500"), None);
        assert_eq!(parse_viewport("10,twenty,300,400"), None);
        assert_eq!(parse_viewport("10,20,,400"), None);
        assert_eq!(parse_viewport(""), None);
    }
}
