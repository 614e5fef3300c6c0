//! Editor styling.
//!
//! Each interactive kind gets a style pair: one look when selected and one
//! otherwise. The core never inspects a style beyond picking one of the two.

use egui::{Color32, Stroke};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub fill: Color32,
    pub stroke: Stroke,
    pub corner_radius: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StylePair {
    pub default: ElementStyle,
    pub selected: ElementStyle,
}

impl StylePair {
    pub fn pick(&self, selected: bool) -> &ElementStyle {
        if selected {
            &self.selected
        } else {
            &self.default
        }
    }
}

/// Visual styling configuration for the graph editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorStyle {
    pub node: StylePair,
    pub port: StylePair,
    pub text_box: StylePair,
    pub connection: StylePair,
    pub text_color: Color32,
    pub handle_color: Color32,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_font_size() -> f32 {
    12.0
}

impl Default for EditorStyle {
    fn default() -> Self {
        let box_style = |fill: Color32, stroke: Color32, radius: u8| ElementStyle {
            fill,
            stroke: Stroke::new(1.0, stroke),
            corner_radius: radius,
        };
        let line_style = |color: Color32, width: f32| ElementStyle {
            fill: Color32::TRANSPARENT,
            stroke: Stroke::new(width, color),
            corner_radius: 0,
        };
        Self {
            node: StylePair {
                default: box_style(Color32::from_gray(60), Color32::from_gray(20), 4),
                selected: box_style(Color32::from_gray(75), Color32::from_rgb(240, 170, 40), 4),
            },
            port: StylePair {
                default: box_style(Color32::from_gray(140), Color32::from_gray(30), 2),
                selected: box_style(Color32::from_rgb(240, 170, 40), Color32::WHITE, 2),
            },
            text_box: StylePair {
                default: box_style(Color32::from_gray(45), Color32::from_gray(35), 2),
                selected: box_style(Color32::from_gray(30), Color32::from_rgb(90, 150, 230), 2),
            },
            connection: StylePair {
                default: line_style(Color32::from_gray(200), 2.0),
                selected: line_style(Color32::from_rgb(240, 170, 40), 3.0),
            },
            text_color: Color32::from_gray(220),
            handle_color: Color32::WHITE,
            font_size: 12.0,
        }
    }
}
