use arrayvec::ArrayVec;
use std::fmt;

pub const COLUMN_COUNT: usize = 6;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Column {
    Name,
    Type,
    Size,
    Channels,
    Width,
    Height,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Name,
        Column::Type,
        Column::Size,
        Column::Channels,
        Column::Width,
        Column::Height,
    ];

    pub fn from_index(col: usize) -> Option<Self> {
        Self::ALL.get(col).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Type => "Type",
            Column::Size => "Size",
            Column::Channels => "Channels",
            Column::Width => "Width",
            Column::Height => "Height",
        }
    }

    pub fn alignment(self) -> Alignment {
        match self {
            Column::Width => Alignment::Right,
            _ => Alignment::Left,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Cell {
    Text(String),
    Number(u32),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.2} kB", bytes as f64 / 1024.0)
}

/// Read side of a table, as consumed by the table widget.
pub trait TableModel {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    /// `None` for out of range cells and for values that are not known yet.
    fn data(&self, row: usize, col: usize) -> Option<Cell>;

    fn header_data(&self, col: usize) -> Option<&'static str> {
        Column::from_index(col).map(Column::title)
    }

    fn alignment(&self, col: usize) -> Alignment {
        Column::from_index(col)
            .map(Column::alignment)
            .unwrap_or(Alignment::Left)
    }

    fn row(&self, row: usize) -> ArrayVec<Option<Cell>, COLUMN_COUNT> {
        (0..COLUMN_COUNT).map(|col| self.data(row, col)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl TableModel for Fixed {
        fn row_count(&self) -> usize {
            1
        }

        fn data(&self, row: usize, col: usize) -> Option<Cell> {
            (row == 0 && col == 0).then(|| Cell::Text("only".to_string()))
        }
    }

    #[test]
    fn headers() {
        let titles: Vec<_> = (0..Fixed.column_count())
            .filter_map(|c| Fixed.header_data(c))
            .collect();
        assert_eq!(titles, ["Name", "Type", "Size", "Channels", "Width", "Height"]);
        assert_eq!(Fixed.header_data(6), None);
    }

    #[test]
    fn only_width_is_right_aligned() {
        for col in 0..COLUMN_COUNT {
            let expected = if col == 4 {
                Alignment::Right
            } else {
                Alignment::Left
            };
            assert_eq!(Fixed.alignment(col), expected);
        }
    }

    #[test]
    fn size_in_kilobytes() {
        assert_eq!(format_size(2048), "2.00 kB");
        assert_eq!(format_size(1536), "1.50 kB");
        assert_eq!(format_size(0), "0.00 kB");
    }

    #[test]
    fn row_collects_every_column() {
        let row = Fixed.row(0);
        assert_eq!(row.len(), COLUMN_COUNT);
        assert_eq!(row[0], Some(Cell::Text("only".to_string())));
        assert!(row[1..].iter().all(Option::is_none));
    }
}
