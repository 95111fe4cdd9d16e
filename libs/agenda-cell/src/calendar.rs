use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

pub const DAY_NAMES: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

/// Whether a day can be picked at all: weekends and days strictly before
/// `today` are never selectable client-side. The server remains the
/// authority on actual availability.
pub fn is_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    let weekday = date.weekday();
    let weekend = weekday == Weekday::Sat || weekday == Weekday::Sun;
    !weekend && date >= today
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub selectable: bool,
}

/// A 6x7 month grid starting on Sunday, with leading/trailing cells from
/// the neighboring months rendered but never selectable.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    today: NaiveDate,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32, today: NaiveDate) -> Self {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
        let leading = first.weekday().num_days_from_sunday() as i64;
        let grid_start = first - Duration::days(leading);

        let cells = (0..42)
            .map(|offset| {
                let date = grid_start + Duration::days(offset);
                let in_month = date.year() == year && date.month() == month;
                DayCell {
                    date,
                    in_month,
                    selectable: in_month && is_selectable(date, today),
                }
            })
            .collect();

        Self {
            year,
            month,
            today,
            cells,
        }
    }

    pub fn for_today(today: NaiveDate) -> Self {
        Self::new(today.year(), today.month(), today)
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// The grid as six rows of seven days, for rendering.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.date == date && cell.selectable)
    }

    pub fn title(&self) -> String {
        let name = MONTH_NAMES[(self.month - 1) as usize];
        format!("{} {}", name, self.year)
    }

    pub fn next_month(&self) -> Self {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::new(year, month, self.today)
    }

    pub fn prev_month(&self) -> Self {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        Self::new(year, month, self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-08-07 is a Friday.
    const TODAY: (i32, u32, u32) = (2026, 8, 7);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn weekends_are_never_selectable() {
        let grid = MonthGrid::for_today(today());
        assert!(!grid.is_selectable(date(2026, 8, 8))); // Saturday
        assert!(!grid.is_selectable(date(2026, 8, 9))); // Sunday
        assert!(grid.is_selectable(date(2026, 8, 10))); // Monday
    }

    #[test]
    fn past_days_are_never_selectable() {
        let grid = MonthGrid::for_today(today());
        assert!(!grid.is_selectable(date(2026, 8, 6)));
        assert!(!grid.is_selectable(date(2026, 8, 3)));
        // Today itself stays selectable.
        assert!(grid.is_selectable(today()));
    }

    #[test]
    fn grid_is_six_weeks_starting_sunday() {
        let grid = MonthGrid::for_today(today());
        assert_eq!(grid.cells().len(), 42);
        // August 2026 starts on a Saturday; the grid starts on the
        // preceding Sunday, July 26.
        assert_eq!(grid.cells()[0].date, date(2026, 7, 26));
        assert!(!grid.cells()[0].in_month);
        assert_eq!(grid.weeks().count(), 6);
    }

    #[test]
    fn out_of_month_cells_are_not_selectable() {
        let grid = MonthGrid::for_today(today());
        // Monday August 31 is followed by Tuesday September 1 in the grid.
        assert!(grid.is_selectable(date(2026, 8, 31)));
        assert!(!grid.is_selectable(date(2026, 9, 1)));
    }

    #[test]
    fn navigation_wraps_across_year_end() {
        let december = MonthGrid::new(2026, 12, today());
        let january = december.next_month();
        assert_eq!(january.title(), "Enero 2027");
        assert_eq!(january.prev_month().title(), "Diciembre 2026");
    }

    #[test]
    fn future_month_days_are_selectable_on_weekdays() {
        let grid = MonthGrid::for_today(today()).next_month();
        assert_eq!(grid.title(), "Septiembre 2026");
        assert!(grid.is_selectable(date(2026, 9, 1))); // Tuesday
        assert!(!grid.is_selectable(date(2026, 9, 5))); // Saturday
    }
}
