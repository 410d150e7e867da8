//! Builds the typed [`Library`] from the generic Liberty tree.
//!
//! The builder is the only component that knows what Liberty group and
//! attribute names mean. It resolves table templates, reduces lookup tables
//! to a single operating point through the configured [`TableReducer`],
//! normalizes every value to picoseconds/femtofarads on the way in, and
//! validates referential integrity. Any violation aborts with a
//! [`ModelError`]; data oddities that can be preserved faithfully (unordered
//! triples, oversized tables) become warnings instead.

use crate::error::ModelError;
use crate::model::{
    Cell, CheckKind, ClockEdge, DelayValue, Direction, Library, Pin, TimingArc, TimingCheck,
    TimingSense, Transition,
};
use crate::reduce::{FirstEntry, LutTable, TableReducer};
use crate::units::{CapScale, TimeScale};
use indexmap::IndexMap;
use sdforge_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use sdforge_liberty::{AttrValue, GroupNode};
use std::collections::{HashMap, HashSet};

/// Simple attributes of a `timing` group the builder understands. Anything
/// else is skipped with a `T003` warning.
const KNOWN_TIMING_ATTRS: &[&str] = &["related_pin", "timing_sense", "timing_type", "when", "sdf_cond"];

/// Configuration passed explicitly into [`build`].
///
/// Held by the caller rather than as process-wide state, so parallel batch
/// conversion cannot observe cross-file interference.
pub struct BuildConfig<'a> {
    /// The table-reduction strategy. Defaults to first-entry-plus-warning.
    pub reducer: &'a dyn TableReducer,
}

impl Default for BuildConfig<'static> {
    fn default() -> Self {
        Self {
            reducer: &FirstEntry,
        }
    }
}

/// Walks the generic tree and extracts a fully validated [`Library`].
///
/// On success the returned model is complete and immutable; on error no
/// partial model escapes. Warnings go to `sink`.
pub fn build(
    tree: &GroupNode,
    config: &BuildConfig,
    sink: &DiagnosticSink,
) -> Result<Library, ModelError> {
    Builder {
        config,
        sink,
        time: TimeScale::PS,
        cap: CapScale::FF,
        templates: HashMap::new(),
    }
    .build(tree)
}

/// An `index_1`/`index_2` pair declared by a `lu_table_template`.
struct Template {
    index_1: Vec<f64>,
    index_2: Vec<f64>,
}

struct Builder<'a> {
    config: &'a BuildConfig<'a>,
    sink: &'a DiagnosticSink,
    time: TimeScale,
    cap: CapScale,
    templates: HashMap<String, Template>,
}

impl Builder<'_> {
    fn build(mut self, tree: &GroupNode) -> Result<Library, ModelError> {
        if tree.kind != "library" {
            return Err(ModelError::UnexpectedRoot {
                found: tree.kind.clone(),
                span: tree.span,
            });
        }
        let name = tree.name.clone().unwrap_or_default();

        let declared_time_unit =
            tree.simple_text("time_unit")
                .ok_or(ModelError::MissingUnits {
                    attr: "time_unit",
                    span: tree.span,
                })?;
        self.time = TimeScale::parse(&declared_time_unit)?;
        self.cap = self.parse_cap_unit(tree)?;

        for template in tree.children_of("lu_table_template") {
            let Some(template_name) = template.name.clone() else {
                continue;
            };
            self.templates.insert(
                template_name,
                Template {
                    index_1: first_row(template.table("index_1")),
                    index_2: first_row(template.table("index_2")),
                },
            );
        }

        let mut cells = IndexMap::new();
        for cell_group in tree.children_of("cell") {
            let cell = self.build_cell(cell_group)?;
            cells.insert(cell.name.clone(), cell);
        }

        Ok(Library {
            name,
            declared_time_unit,
            cells,
        })
    }

    fn parse_cap_unit(&self, tree: &GroupNode) -> Result<CapScale, ModelError> {
        let attr = tree
            .attr("capacitive_load_unit")
            .ok_or(ModelError::MissingUnits {
                attr: "capacitive_load_unit",
                span: tree.span,
            })?;
        let invalid = |value: String| ModelError::InvalidAttribute {
            attr: "capacitive_load_unit",
            value,
            span: attr.span,
        };
        match &attr.value {
            AttrValue::Complex(args) if args.len() == 2 => {
                let multiplier = args[0]
                    .as_number()
                    .ok_or_else(|| invalid(args[0].as_text()))?;
                let suffix = args[1].as_text();
                Ok(CapScale::new(multiplier, &suffix)?)
            }
            other => Err(invalid(format!("{other:?}"))),
        }
    }

    fn build_cell(&self, group: &GroupNode) -> Result<Cell, ModelError> {
        let name = group.name.clone().ok_or(ModelError::MissingAttribute {
            group: "cell".to_string(),
            attr: "name",
            span: group.span,
        })?;

        // Arc targets are validated against the declared pin set, so a
        // dangling reference is caught no matter where the pin appears.
        let pin_names: HashSet<&str> = group
            .children_of("pin")
            .filter_map(|p| p.name.as_deref())
            .collect();

        let mut pins = IndexMap::new();
        for pin_group in group.children_of("pin") {
            let pin = self.build_pin(pin_group, &name, &pin_names)?;
            pins.insert(pin.name.clone(), pin);
        }

        Ok(Cell {
            name,
            area: group.simple_number("area"),
            pins,
        })
    }

    fn build_pin(
        &self,
        group: &GroupNode,
        cell: &str,
        pin_names: &HashSet<&str>,
    ) -> Result<Pin, ModelError> {
        let name = group.name.clone().ok_or(ModelError::MissingAttribute {
            group: "pin".to_string(),
            attr: "name",
            span: group.span,
        })?;

        let mut direction: Option<Direction> = None;
        for attr in group.attributes.iter().filter(|a| a.name == "direction") {
            let text = match &attr.value {
                AttrValue::Simple(v) => v.as_text(),
                _ => String::new(),
            };
            let parsed: Direction =
                text.parse().map_err(|()| ModelError::InvalidAttribute {
                    attr: "direction",
                    value: text.clone(),
                    span: attr.span,
                })?;
            match direction {
                None => direction = Some(parsed),
                Some(existing) if existing == parsed => {}
                Some(_) => {
                    return Err(ModelError::ConflictingDirection {
                        cell: cell.to_string(),
                        pin: name,
                        span: attr.span,
                    });
                }
            }
        }
        let direction = direction.ok_or(ModelError::MissingAttribute {
            group: "pin".to_string(),
            attr: "direction",
            span: group.span,
        })?;

        let capacitance_ff = group.simple_number("capacitance").map(|c| self.cap.to_ff(c));

        let mut arcs = Vec::new();
        let mut checks = Vec::new();
        for timing in group.children_of("timing") {
            let related_pin =
                timing
                    .simple_text("related_pin")
                    .ok_or(ModelError::MissingAttribute {
                        group: "timing".to_string(),
                        attr: "related_pin",
                        span: timing.span,
                    })?;
            if !pin_names.contains(related_pin.as_str()) {
                return Err(ModelError::DanglingReference {
                    cell: cell.to_string(),
                    pin: name,
                    related: related_pin,
                    span: timing.span,
                });
            }
            self.warn_unused_attrs(timing);

            let timing_type = timing.simple_text("timing_type");
            match timing_type.as_deref().and_then(parse_check_type) {
                Some((kind, edge)) => {
                    self.build_checks(timing, &name, &related_pin, kind, edge, &mut checks)?;
                }
                None => {
                    arcs.push(self.build_arc(timing, &name, related_pin)?);
                }
            }
        }

        Ok(Pin {
            name,
            direction,
            capacitance_ff,
            arcs,
            checks,
        })
    }

    fn build_arc(
        &self,
        timing: &GroupNode,
        pin: &str,
        related_pin: String,
    ) -> Result<TimingArc, ModelError> {
        let sense = match timing.simple_text("timing_sense") {
            Some(text) => {
                Some(
                    text.parse::<TimingSense>()
                        .map_err(|()| ModelError::InvalidAttribute {
                            attr: "timing_sense",
                            value: text,
                            span: timing.span,
                        })?,
                )
            }
            None => None,
        };

        Ok(TimingArc {
            related_pin,
            sense,
            when: timing.simple_text("when"),
            rise: self.delay_from_tables(timing, pin, "cell_rise")?,
            fall: self.delay_from_tables(timing, pin, "cell_fall")?,
        })
    }

    fn build_checks(
        &self,
        timing: &GroupNode,
        pin: &str,
        related_pin: &str,
        kind: CheckKind,
        edge: ClockEdge,
        checks: &mut Vec<TimingCheck>,
    ) -> Result<(), ModelError> {
        let constraints = [
            ("rise_constraint", Transition::Rise),
            ("fall_constraint", Transition::Fall),
        ];
        for (table_kind, transition) in constraints {
            if let Some(value) = self.delay_from_tables(timing, pin, table_kind)? {
                checks.push(TimingCheck {
                    kind,
                    related_pin: related_pin.to_string(),
                    edge,
                    transition,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Collapses the repeated delay-table groups of one kind into a
    /// [`DelayValue`]: one group is a scalar, three (a multi-corner merge)
    /// are a min/typ/max triple in declaration order.
    fn delay_from_tables(
        &self,
        timing: &GroupNode,
        pin: &str,
        table_kind: &str,
    ) -> Result<Option<DelayValue>, ModelError> {
        let groups: Vec<&GroupNode> = timing.children_of(table_kind).collect();
        let value = match groups.len() {
            0 => return Ok(None),
            1 => DelayValue::Scalar(self.reduce_table(groups[0])?),
            3 => DelayValue::Triple {
                min: self.reduce_table(groups[0])?,
                typ: self.reduce_table(groups[1])?,
                max: self.reduce_table(groups[2])?,
            },
            found => {
                return Err(ModelError::CornerCount {
                    pin: pin.to_string(),
                    table: table_kind.to_string(),
                    found,
                    span: timing.span,
                });
            }
        };
        if !value.is_ordered() {
            if let DelayValue::Triple { min, typ, max } = value {
                self.sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::MIN_TYP_MAX_OUT_OF_ORDER,
                        format!(
                            "'{table_kind}' triple ({min}:{typ}:{max}) ps is not ordered min <= typ <= max"
                        ),
                        groups[0].span,
                    )
                    .with_note("values are emitted as characterized, never reordered"),
                );
            }
        }
        Ok(Some(value))
    }

    /// Resolves one delay-table group against its template and reduces it to
    /// a single normalized picosecond value.
    fn reduce_table(&self, group: &GroupNode) -> Result<i64, ModelError> {
        let values = group
            .table("values")
            .ok_or(ModelError::MissingAttribute {
                group: group.kind.clone(),
                attr: "values",
                span: group.span,
            })?
            .to_vec();

        let template = group.name.as_deref().and_then(|n| self.templates.get(n));
        let index_1 = first_row(group.table("index_1"));
        let index_1 = if index_1.is_empty() {
            template.map_or(Vec::new(), |t| t.index_1.clone())
        } else {
            index_1
        };
        let index_2 = first_row(group.table("index_2"));
        let index_2 = if index_2.is_empty() {
            template.map_or(Vec::new(), |t| t.index_2.clone())
        } else {
            index_2
        };

        let table = LutTable {
            index_1,
            index_2,
            values,
        };
        self.check_dimensions(group, &table)?;
        let reduction = self.config.reducer.reduce(&table);
        if reduction.ambiguous {
            let (rows, cols) = table.dims();
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::AMBIGUOUS_TABLE_REDUCTION,
                    format!(
                        "'{}' table has {rows}x{cols} entries; using the first",
                        group.kind
                    ),
                    group.span,
                )
                .with_note("supply an operating point to select a different entry"),
            );
        }
        Ok(self.time.to_ps(reduction.value))
    }

    /// Rejects a `values` grid whose shape disagrees with the resolved
    /// `index_1`/`index_2` counts.
    ///
    /// Tables with no indexes at all (plain scalars) are not checked. A
    /// one-dimensional table may appear as a single row, which Liberty
    /// writers commonly produce.
    fn check_dimensions(&self, group: &GroupNode, table: &LutTable) -> Result<(), ModelError> {
        if table.index_1.is_empty() && table.index_2.is_empty() {
            return Ok(());
        }
        let (found_rows, found_cols) = table.dims();
        let expected_rows = table.index_1.len().max(1);
        let expected_cols = table.index_2.len().max(1);
        let exact = (found_rows, found_cols) == (expected_rows, expected_cols);
        let single_row = expected_cols == 1 && found_rows == 1 && found_cols == expected_rows;
        if exact || single_row {
            return Ok(());
        }
        Err(ModelError::TableDimensionMismatch {
            table: group.kind.clone(),
            expected_rows,
            expected_cols,
            found_rows,
            found_cols,
            span: group.span,
        })
    }

    fn warn_unused_attrs(&self, timing: &GroupNode) {
        for attr in &timing.attributes {
            let known = KNOWN_TIMING_ATTRS.contains(&attr.name.as_str())
                || matches!(attr.value, AttrValue::Table(_));
            if !known && matches!(attr.value, AttrValue::Simple(_)) {
                self.sink.emit(Diagnostic::warning(
                    DiagnosticCode::UNUSED_ATTRIBUTE,
                    format!("attribute '{}' is not timing-relevant; skipped", attr.name),
                    attr.span,
                ));
            }
        }
    }
}

/// Maps a Liberty `timing_type` to a check kind and clock edge. Returns
/// `None` for delay-arc types (`combinational`, `rising_edge`, ...).
fn parse_check_type(timing_type: &str) -> Option<(CheckKind, ClockEdge)> {
    let (kind, edge) = timing_type.rsplit_once('_')?;
    let edge = match edge {
        "rising" => ClockEdge::Rising,
        "falling" => ClockEdge::Falling,
        _ => return None,
    };
    let kind = match kind {
        "setup" => CheckKind::Setup,
        "hold" => CheckKind::Hold,
        "recovery" => CheckKind::Recovery,
        "removal" => CheckKind::Removal,
        _ => return None,
    };
    Some((kind, edge))
}

fn first_row(rows: Option<&[Vec<f64>]>) -> Vec<f64> {
    rows.and_then(|r| r.first()).cloned().unwrap_or_default()
}
