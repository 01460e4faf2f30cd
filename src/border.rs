use crate::color::Color;
use crate::error::{Error, ErrorKind, Result};

/// Border settings for a rectangular region of the calendar.
///
/// The calendar is addressed by a 5x5 grid of coordinates, both running from
/// 1 to 5. Odd coordinates are border lines, even ones are label regions:
/// x=2 is the week number column, x=4 the date columns, y=2 the weekday
/// header and y=4 the date rows. A property applies to every border line
/// inside its rectangle; a later property in a list overrides earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarBorderProperties {
    upper_left: (u8, u8),
    lower_right: (u8, u8),
    color: Option<Color>,
    thickness: Option<u8>,
}

impl CalendarBorderProperties {
    pub fn new(
        upper_left: (u8, u8),
        lower_right: (u8, u8),
        color: Option<Color>,
        thickness: Option<u8>,
    ) -> Result<Self> {
        let in_range = |v: u8| (1..=5).contains(&v);

        if ![upper_left.0, upper_left.1, lower_right.0, lower_right.1]
            .iter()
            .all(|&v| in_range(v))
        {
            return Err(Error::new(
                ErrorKind::BorderCoordinates,
                &format!(
                    "{:?}-{:?}: coordinates must be within 1..=5",
                    upper_left, lower_right
                ),
            ));
        }

        if upper_left.0 > lower_right.0 || upper_left.1 > lower_right.1 {
            return Err(Error::new(
                ErrorKind::BorderCoordinates,
                &format!(
                    "{:?}-{:?}: upper left corner lies below or right of lower right corner",
                    upper_left, lower_right
                ),
            ));
        }

        Ok(CalendarBorderProperties {
            upper_left,
            lower_right,
            color,
            thickness,
        })
    }

    pub fn upper_left(&self) -> (u8, u8) {
        self.upper_left
    }

    pub fn lower_right(&self) -> (u8, u8) {
        self.lower_right
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn thickness(&self) -> Option<u8> {
        self.thickness
    }

    pub fn covers(&self, x: u8, y: u8) -> bool {
        (self.upper_left.0..=self.lower_right.0).contains(&x)
            && (self.upper_left.1..=self.lower_right.1).contains(&y)
    }
}

/// Border set used unless a custom list was supplied. Depends on whether the
/// week number column is shown.
pub fn default_borders(
    week_numbers_displayed: bool,
    label_color: Color,
) -> Vec<CalendarBorderProperties> {
    let border = |upper_left, lower_right, color, thickness| CalendarBorderProperties {
        upper_left,
        lower_right,
        color: Some(color),
        thickness: Some(thickness),
    };

    let mut borders = vec![
        border((1, 1), (5, 5), Color::BLACK, 0),
        border((3, 1), (5, 3), label_color, 1),
    ];

    if week_numbers_displayed {
        borders.push(border((1, 3), (3, 5), label_color, 1));
    }

    borders
}

/// Effective thickness and color of the border line at `(x, y)`.
pub fn border_at(
    borders: &[CalendarBorderProperties],
    x: u8,
    y: u8,
) -> (Option<Color>, Option<u8>) {
    borders
        .iter()
        .filter(|b| b.covers(x, y))
        .fold((None, None), |(color, thickness), b| {
            (b.color.or(color), b.thickness.or(thickness))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_out_of_range_fail() {
        assert!(CalendarBorderProperties::new((0, 1), (5, 5), None, None).is_err());
        assert!(CalendarBorderProperties::new((1, 1), (6, 5), None, None).is_err());
        assert!(CalendarBorderProperties::new((4, 4), (2, 5), None, None).is_err());
        assert!(CalendarBorderProperties::new((1, 1), (5, 5), None, Some(2)).is_ok());
    }

    #[test]
    fn default_set_depends_on_week_numbers() {
        let label = Color::rgb(1, 2, 3);
        assert_eq!(default_borders(false, label).len(), 2);

        let with_weeks = default_borders(true, label);
        assert_eq!(with_weeks.len(), 3);
        assert_eq!(border_at(&with_weeks, 3, 4), (Some(label), Some(1)));
        assert_eq!(border_at(&with_weeks, 5, 5), (Some(Color::BLACK), Some(0)));
    }

    #[test]
    fn later_properties_override_only_what_they_set() {
        let borders = vec![
            CalendarBorderProperties::new((1, 1), (5, 5), Some(Color::RED), Some(1)).unwrap(),
            CalendarBorderProperties::new((1, 1), (1, 5), None, Some(3)).unwrap(),
        ];
        assert_eq!(border_at(&borders, 1, 1), (Some(Color::RED), Some(3)));
        assert_eq!(border_at(&borders, 2, 1), (Some(Color::RED), Some(1)));
    }
}
