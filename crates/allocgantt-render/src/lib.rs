//! # allocgantt-render
//!
//! Rendering backends for the allocation pivot.
//!
//! This crate provides:
//! - Standalone HTML grid rendering (colored Gantt-style table)
//! - Colorized Excel export
//!
//! Both consume the built [`PivotTable`](allocgantt_core::PivotTable) and
//! nothing upstream of it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use allocgantt_core::Renderer;
//! use allocgantt_render::{ExcelExporter, HtmlGridRenderer};
//!
//! let html = HtmlGridRenderer::new().zoom(120).render(&pivot)?;
//! std::fs::write("gantt.html", html)?;
//!
//! let xlsx = ExcelExporter::new().render(&pivot)?;
//! std::fs::write("Gantt_Alocacao.xlsx", xlsx)?;
//! ```

pub mod excel;
pub mod html;

pub use excel::ExcelExporter;
pub use html::HtmlGridRenderer;
