use crate::image_list::ImageList;
use crate::table::{Alignment, Cell, TableModel};
use eframe::egui::*;
use egui_extras::{Size, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TableAction {
    SetCurrent(usize),
    ToggleSelected(usize),
}

pub struct ImageTable<'a> {
    list: &'a ImageList,
}

impl<'a> ImageTable<'a> {
    pub fn new(list: &'a ImageList) -> Self {
        Self { list }
    }

    fn cell_ui(ui: &mut Ui, cell: Option<Cell>, alignment: Alignment) {
        let text = cell.map(|c| c.to_string()).unwrap_or_default();
        let dir = match alignment {
            Alignment::Left => Direction::LeftToRight,
            Alignment::Right => Direction::RightToLeft,
        };
        ui.with_layout(Layout::from_main_dir_and_cross_align(dir, Align::Center), |ui| {
            ui.label(text)
        });
    }

    pub fn ui(self, ui: &mut Ui) -> Option<TableAction> {
        let list = self.list;
        let columns = list.column_count();
        let current = list.current_index();
        let mut action = None;

        let mut builder = TableBuilder::new(ui).striped(true);
        for col in 0..columns {
            builder = builder.column(if col == 0 {
                Size::remainder()
            } else {
                Size::exact(64.0)
            });
        }
        builder
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for col in 0..columns {
                    header.col(|ui| {
                        ui.strong(list.header_data(col).unwrap_or_default());
                    });
                }
            })
            .body(|mut body| {
                for row in 0..list.row_count() {
                    let mut cells = list.row(row).into_iter();
                    let name = cells.next().flatten();
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            let highlighted = current == Some(row) || list.is_selected(row);
                            let text = name.map(|c| c.to_string()).unwrap_or_default();
                            if ui.selectable_label(highlighted, text).clicked() {
                                action = Some(if ui.input().modifiers.ctrl {
                                    TableAction::ToggleSelected(row)
                                } else {
                                    TableAction::SetCurrent(row)
                                });
                            }
                        });
                        for (col, cell) in cells.enumerate() {
                            let alignment = list.alignment(col + 1);
                            table_row.col(|ui| Self::cell_ui(ui, cell, alignment));
                        }
                    });
                }
            });
        action
    }
}
