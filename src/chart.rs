use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub f32);

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.0, self.1, self.2, self.3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    pub x_stacked: bool,
    pub y_stacked: bool,
    pub y_begin_at_zero: bool,
}

/// Everything a charting backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axes: Axes,
}

/// A live chart occupying the drawing surface.
pub trait Chart {
    /// Releases the surface. Called exactly once before the chart is dropped.
    fn destroy(&mut self);
    fn lines(&self) -> Vec<String>;
}

pub trait ChartAdapter {
    type Chart: Chart;

    fn draw(&mut self, config: ChartConfig) -> Self::Chart;
}

/// Holds at most one chart. A new chart is only built after the previous
/// occupant has been destroyed.
pub struct ChartSlot<C: Chart> {
    current: Option<C>,
}

impl<C: Chart> Default for ChartSlot<C> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<C: Chart> ChartSlot<C> {
    pub fn replace(&mut self, build: impl FnOnce() -> C) {
        if let Some(mut previous) = self.current.take() {
            previous.destroy();
        }
        self.current = Some(build());
    }

    pub fn current(&self) -> Option<&C> {
        self.current.as_ref()
    }
}

impl<C: Chart> Drop for ChartSlot<C> {
    fn drop(&mut self) {
        if let Some(mut chart) = self.current.take() {
            chart.destroy();
        }
    }
}

const BAR_WIDTH: u64 = 40;

/// Draws stacked horizontal bars as text, one line per bucket.
#[derive(Debug, Default)]
pub struct TextChartAdapter;

#[derive(Debug)]
pub struct TextChart {
    surface: Vec<String>,
}

impl ChartAdapter for TextChartAdapter {
    type Chart = TextChart;

    fn draw(&mut self, config: ChartConfig) -> TextChart {
        TextChart {
            surface: draw_stacked_bars(&config),
        }
    }
}

impl Chart for TextChart {
    fn destroy(&mut self) {
        self.surface.clear();
    }

    fn lines(&self) -> Vec<String> {
        self.surface.clone()
    }
}

const GLYPHS: [char; 3] = ['#', '=', '.'];

fn draw_stacked_bars(config: &ChartConfig) -> Vec<String> {
    let stack_height = |index: usize| -> u64 {
        config
            .datasets
            .iter()
            .map(|dataset| dataset.data.get(index).copied().unwrap_or(0))
            .sum()
    };
    let peak = (0..config.labels.len()).map(stack_height).max().unwrap_or(0).max(1);
    let label_width = config.labels.iter().map(String::len).max().unwrap_or(0);

    let legend = config
        .datasets
        .iter()
        .zip(GLYPHS.iter().cycle())
        .map(|(dataset, glyph)| format!("{glyph} {}", dataset.label))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![legend];
    for (index, label) in config.labels.iter().enumerate() {
        let mut bar = String::new();
        let mut counts = Vec::with_capacity(config.datasets.len());
        for (dataset, glyph) in config.datasets.iter().zip(GLYPHS.iter().cycle()) {
            let value = dataset.data.get(index).copied().unwrap_or(0);
            let width = (value * BAR_WIDTH).div_ceil(peak) as usize;
            bar.extend(std::iter::repeat_n(*glyph, width));
            counts.push(value.to_string());
        }
        lines.push(format!("{label:<label_width$} |{bar} {}", counts.join("/")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Probe {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Chart for Probe {
        fn destroy(&mut self) {
            self.log.borrow_mut().push("destroy");
        }

        fn lines(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn slot_destroys_before_building_next() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = ChartSlot::default();
        for _ in 0..2 {
            slot.replace(|| {
                log.borrow_mut().push("create");
                Probe { log: Rc::clone(&log) }
            });
        }
        assert_eq!(*log.borrow(), vec!["create", "destroy", "create"]);
        assert!(slot.current().is_some());
        drop(slot);
        assert_eq!(log.borrow().last(), Some(&"destroy"));
    }

    #[test]
    fn text_chart_draws_one_line_per_bucket() {
        let config = ChartConfig {
            kind: ChartKind::Bar,
            labels: vec!["mon".into(), "tue".into()],
            datasets: vec![
                Dataset { label: "A".into(), data: vec![1, 0], color: Rgba(0, 0, 0, 1.0) },
                Dataset { label: "B".into(), data: vec![1, 2], color: Rgba(0, 0, 0, 1.0) },
            ],
            axes: Axes { x_stacked: true, y_stacked: true, y_begin_at_zero: true },
        };
        let mut chart = TextChartAdapter.draw(config);
        let lines = chart.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "# A  = B");
        assert!(lines[1].starts_with("mon |") && lines[1].ends_with(" 1/1"));
        assert!(lines[2].starts_with("tue |") && lines[2].ends_with(" 0/2"));
        chart.destroy();
        assert!(chart.lines().is_empty());
    }
}
