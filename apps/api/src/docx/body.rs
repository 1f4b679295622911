//! `word/document.xml` ↔ `DocumentGrid`.
//!
//! The body is kept as an owned list of XML events. Only top-level tables
//! become part of the grid; each cell remembers the event range it occupies so
//! that written cells can be spliced back in without touching anything else.

use std::collections::HashMap;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::docx::DocxError;
use crate::template::{Cell, DocumentGrid, Row, RunStyle, Table};

const TBL: &[u8] = b"w:tbl";
const TR: &[u8] = b"w:tr";
const TC: &[u8] = b"w:tc";
const TC_PR: &[u8] = b"w:tcPr";
const GRID_SPAN: &[u8] = b"w:gridSpan";
const P: &[u8] = b"w:p";
const R: &[u8] = b"w:r";
const T: &[u8] = b"w:t";
const TAB: &[u8] = b"w:tab";
const BR: &[u8] = b"w:br";
const CR: &[u8] = b"w:cr";
const BODY: &[u8] = b"w:body";
const SDT: &[u8] = b"w:sdt";
const SDT_CONTENT: &[u8] = b"w:sdtContent";

// ────────────────────────────────────────────────────────────────────────────
// Run text collection
// ────────────────────────────────────────────────────────────────────────────

/// Collects the visible text of runs: `w:t` content, `w:tab` as a tab and
/// `w:br`/`w:cr` as a line break. Tab stops and other non-run elements with
/// the same names are ignored.
#[derive(Debug, Default)]
struct RunText {
    run_depth: usize,
    in_text: bool,
    text: String,
}

impl RunText {
    fn start(&mut self, name: &[u8]) {
        match name {
            R => self.run_depth += 1,
            T if self.run_depth > 0 => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.run_depth == 0 {
            return;
        }
        match name {
            TAB => self.text.push('\t'),
            BR | CR => self.text.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            R => self.run_depth = self.run_depth.saturating_sub(1),
            T => self.in_text = false,
            _ => {}
        }
    }

    fn event(&mut self, event: &Event<'_>) {
        if !self.in_text {
            return;
        }
        match event {
            Event::Text(t) => self.text.push_str(&unescape_xml(&String::from_utf8_lossy(t))),
            Event::CData(c) => self.text.push_str(&String::from_utf8_lossy(c)),
            Event::GeneralRef(r) => {
                let name = String::from_utf8_lossy(r);
                match resolve_entity(&name) {
                    Some(c) => self.text.push(c),
                    None => {
                        self.text.push('&');
                        self.text.push_str(&name);
                        self.text.push(';');
                    }
                }
            }
            _ => {}
        }
    }

    fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

/// Character for a predefined or numeric entity name (without `&` and `;`).
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Resolves `&name;` references left inside a text run. Unknown references
/// are kept as written.
fn unescape_xml(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').and_then(|semi| Some((semi, resolve_entity(&after[..semi])?))) {
            Some((semi, c)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Parsed body
// ────────────────────────────────────────────────────────────────────────────

/// Where a grid cell lives in the event list.
#[derive(Debug, Clone)]
struct CellSpan {
    table: usize,
    row: usize,
    cell: usize,
    /// `<w:tc>` start (or empty) event.
    start: usize,
    /// `</w:tc>` end event; equal to `start` for `<w:tc/>`.
    end: usize,
    /// Inclusive range of the direct `w:tcPr` child.
    tc_pr: Option<(usize, usize)>,
}

/// Cell under construction while walking the events.
#[derive(Debug)]
struct OpenCell {
    start: usize,
    depth: usize,
    span: usize,
    tc_pr_start: Option<usize>,
    tc_pr: Option<(usize, usize)>,
    paragraphs: Vec<String>,
    runs: RunText,
}

impl OpenCell {
    fn new(start: usize, depth: usize) -> Self {
        Self {
            start,
            depth,
            span: 1,
            tc_pr_start: None,
            tc_pr: None,
            paragraphs: Vec::new(),
            runs: RunText::default(),
        }
    }

    fn in_tc_pr(&self) -> bool {
        self.tc_pr_start.is_some() && self.tc_pr.is_none()
    }

    fn text(&mut self) -> String {
        let trailing = self.runs.take();
        if !trailing.is_empty() {
            self.paragraphs.push(trailing);
        }
        self.paragraphs.join("\n")
    }
}

#[derive(Debug, Clone)]
pub struct DocumentBody {
    events: Vec<Event<'static>>,
    cells: Vec<CellSpan>,
}

impl DocumentBody {
    /// Parses the main document part and builds the grid of its top-level tables.
    pub fn parse(xml: &str) -> Result<(Self, DocumentGrid), DocxError> {
        let events = read_events(xml)?;

        let mut tables: Vec<Vec<Vec<Cell>>> = Vec::new();
        let mut spans = Vec::new();
        // Nesting inside the current grid table: 1 = the table itself.
        let mut tbl_depth = 0usize;
        let mut depth = 0usize;
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut open: Option<OpenCell> = None;

        for (idx, event) in events.iter().enumerate() {
            match event {
                Event::Start(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == TBL {
                        if tbl_depth > 0 {
                            tbl_depth += 1;
                        } else if is_body_level(&path) {
                            tbl_depth = 1;
                            tables.push(Vec::new());
                        }
                    } else if tbl_depth == 1 {
                        match (name, open.as_mut()) {
                            (TR, None) => {
                                if let Some(table) = tables.last_mut() {
                                    table.push(Vec::new());
                                }
                            }
                            (TC, None) => open = Some(OpenCell::new(idx, depth)),
                            (TC_PR, Some(cell)) if depth == cell.depth + 1 => {
                                cell.tc_pr_start = Some(idx);
                            }
                            (_, Some(cell)) => cell.runs.start(name),
                            _ => {}
                        }
                    }
                    path.push(name.to_vec());
                    depth += 1;
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if tbl_depth == 1 {
                        match (name, open.as_mut()) {
                            (TC, None) => {
                                let cell = OpenCell::new(idx, depth);
                                push_cell(&mut tables, &mut spans, cell, idx)?;
                            }
                            (TC_PR, Some(cell)) if depth == cell.depth + 1 => {
                                cell.tc_pr = Some((idx, idx));
                            }
                            (GRID_SPAN, Some(cell)) if cell.in_tc_pr() => {
                                cell.span = grid_span(e).unwrap_or(1);
                            }
                            (_, Some(cell)) => cell.runs.empty(name),
                            _ => {}
                        }
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    path.pop();
                    let name = e.name();
                    let name = name.as_ref();
                    if name == TBL {
                        tbl_depth = tbl_depth.saturating_sub(1);
                    } else if tbl_depth == 1 {
                        match (name, open.as_mut()) {
                            (TC, Some(_)) => {
                                if let Some(cell) = open.take() {
                                    push_cell(&mut tables, &mut spans, cell, idx)?;
                                }
                            }
                            (TC_PR, Some(cell)) if depth == cell.depth + 1 => {
                                cell.tc_pr = cell.tc_pr_start.map(|start| (start, idx));
                            }
                            (P, Some(cell)) => {
                                let text = cell.runs.take();
                                cell.paragraphs.push(text);
                            }
                            (_, Some(cell)) => cell.runs.end(name),
                            _ => {}
                        }
                    }
                }
                other if tbl_depth == 1 => {
                    if let Some(cell) = open.as_mut() {
                        cell.runs.event(other);
                    }
                }
                _ => {}
            }
        }

        let grid = DocumentGrid::new(
            tables
                .into_iter()
                .map(|rows| Table::new(rows.into_iter().map(Row::new).collect()))
                .collect(),
        );
        Ok((Self { events, cells: spans }, grid))
    }

    /// Re-emits the document, replacing every written cell of `grid`.
    pub fn render(&self, grid: &DocumentGrid) -> Result<Vec<u8>, DocxError> {
        let mut replacements: HashMap<usize, (&CellSpan, &Cell)> = HashMap::new();
        for span in &self.cells {
            let cell = grid
                .tables()
                .get(span.table)
                .and_then(|t| t.rows().get(span.row))
                .and_then(|r| r.cells().get(span.cell))
                .ok_or_else(|| {
                    DocxError::Malformed(format!(
                        "grid does not match document: no cell {} in row {} of table {}",
                        span.cell + 1,
                        span.row + 1,
                        span.table + 1
                    ))
                })?;
            if cell.is_written() {
                replacements.insert(span.start, (span, cell));
            }
        }

        let mut writer = Writer::new(Vec::new());
        let mut idx = 0;
        while idx < self.events.len() {
            if let Some((span, cell)) = replacements.get(&idx) {
                self.write_cell(&mut writer, span, cell)?;
                idx = span.end + 1;
                continue;
            }
            write(&mut writer, self.events[idx].clone())?;
            idx += 1;
        }
        Ok(writer.into_inner())
    }

    fn write_cell(
        &self,
        writer: &mut Writer<Vec<u8>>,
        span: &CellSpan,
        cell: &Cell,
    ) -> Result<(), DocxError> {
        let tc = match &self.events[span.start] {
            Event::Start(e) | Event::Empty(e) => e.clone(),
            _ => BytesStart::new("w:tc"),
        };
        write(writer, Event::Start(tc))?;
        if let Some((from, to)) = span.tc_pr {
            for event in &self.events[from..=to] {
                write(writer, event.clone())?;
            }
        }

        let default_style = RunStyle::report();
        let style = cell.written_style().unwrap_or(&default_style);
        write(writer, Event::Start(BytesStart::new("w:p")))?;
        write(writer, Event::Start(BytesStart::new("w:r")))?;
        write_run_properties(writer, style)?;

        for (i, line) in cell.text().split('\n').enumerate() {
            if i > 0 {
                write(writer, Event::Empty(BytesStart::new("w:br")))?;
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    write(writer, Event::Empty(BytesStart::new("w:tab")))?;
                }
                if segment.is_empty() {
                    continue;
                }
                write(
                    writer,
                    Event::Start(BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])),
                )?;
                write(writer, Event::Text(BytesText::new(segment)))?;
                write(writer, Event::End(BytesEnd::new("w:t")))?;
            }
        }

        write(writer, Event::End(BytesEnd::new("w:r")))?;
        write(writer, Event::End(BytesEnd::new("w:p")))?;
        write(writer, Event::End(BytesEnd::new("w:tc")))
    }
}

fn write_run_properties(writer: &mut Writer<Vec<u8>>, style: &RunStyle) -> Result<(), DocxError> {
    let font = style.font.as_str();
    let color = style.color.to_hex();
    write(writer, Event::Start(BytesStart::new("w:rPr")))?;
    write(
        writer,
        Event::Empty(BytesStart::new("w:rFonts").with_attributes([
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:cs", font),
        ])),
    )?;
    write(
        writer,
        Event::Empty(BytesStart::new("w:color").with_attributes([("w:val", color.as_str())])),
    )?;
    write(writer, Event::End(BytesEnd::new("w:rPr")))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DocxError> {
    writer
        .write_event(event)
        .map_err(|e| DocxError::Io(format!("Failed to write document XML: {e}")))
}

fn read_events(xml: &str) -> Result<Vec<Event<'static>>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => events.push(event.into_owned()),
        }
    }
    Ok(events)
}

fn push_cell(
    tables: &mut [Vec<Vec<Cell>>],
    spans: &mut Vec<CellSpan>,
    mut cell: OpenCell,
    end: usize,
) -> Result<(), DocxError> {
    let table_idx = tables.len().saturating_sub(1);
    let rows = tables
        .last_mut()
        .ok_or_else(|| DocxError::Malformed("table cell outside of a table".to_string()))?;
    let row_idx = rows.len().saturating_sub(1);
    let row = rows
        .last_mut()
        .ok_or_else(|| DocxError::Malformed("table cell outside of a row".to_string()))?;

    spans.push(CellSpan {
        table: table_idx,
        row: row_idx,
        cell: row.len(),
        start: cell.start,
        end,
        tc_pr: cell.tc_pr,
    });
    row.push(Cell::spanning(cell.text(), cell.span));
    Ok(())
}

/// True when an element opened under `path` sits directly in `w:body`,
/// possibly wrapped in content controls. Tables in text boxes or other
/// run content are not body tables.
fn is_body_level(path: &[Vec<u8>]) -> bool {
    match path.iter().position(|n| n.as_slice() == BODY) {
        Some(body) => path[body + 1..]
            .iter()
            .all(|n| n.as_slice() == SDT || n.as_slice() == SDT_CONTENT),
        None => false,
    }
}

fn grid_span(e: &BytesStart<'_>) -> Option<usize> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"w:val")
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
}

/// Text of the top-level body paragraphs, one line per paragraph. Tables,
/// text boxes and other nested content are not included.
pub fn extract_body_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    // Depth of the open top-level paragraph, and paragraphs nested inside it.
    let mut para: Option<usize> = None;
    let mut nested = 0usize;
    let mut runs = RunText::default();

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                let name = e.name();
                let name = name.as_ref();
                match (name, body_depth, para) {
                    (BODY, None, _) => body_depth = Some(depth),
                    (P, Some(body), None) if depth == body + 1 => para = Some(depth),
                    (P, _, Some(_)) => nested += 1,
                    (_, _, Some(_)) if nested == 0 => runs.start(name),
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = name.as_ref();
                match (name, body_depth, para) {
                    (P, Some(body), None) if depth == body + 1 => paragraphs.push(String::new()),
                    (_, _, Some(_)) if nested == 0 => runs.empty(name),
                    _ => {}
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                let name = e.name();
                let name = name.as_ref();
                match (name, para) {
                    (P, Some(open)) if nested == 0 && depth == open => {
                        paragraphs.push(runs.take());
                        para = None;
                    }
                    (P, Some(_)) => nested = nested.saturating_sub(1),
                    (_, Some(_)) if nested == 0 => runs.end(name),
                    _ => {}
                }
            }
            other if para.is_some() && nested == 0 => runs.event(other),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::testing::{minimal_document, table_xml};
    use crate::template::{write_below, CellCoord};

    #[test]
    fn test_parse_builds_top_level_tables() {
        let xml = minimal_document(&format!(
            "{}<w:p><w:r><w:t>between</w:t></w:r></w:p>{}",
            table_xml(&[&["Focus:   Business Section", "B"], &["", "D"]]),
            table_xml(&[&["Only"]]),
        ));
        let (_, grid) = DocumentBody::parse(&xml).unwrap();

        assert_eq!(grid.table_count(), 2);
        assert_eq!(grid.tables()[0].row_count(), 2);
        assert_eq!(grid.tables()[0].column_count(), 2);
        assert_eq!(
            grid.cell(CellCoord::new(0, 0, 0)).unwrap().text(),
            "Focus:   Business Section"
        );
        assert_eq!(grid.cell(CellCoord::new(1, 0, 0)).unwrap().text(), "Only");
    }

    #[test]
    fn test_cell_text_joins_paragraphs_and_runs() {
        let xml = minimal_document(
            r#"<w:tbl><w:tr><w:tc>
                <w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr>
                <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
                  <w:r><w:t>Focus:</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Action &amp; </w:t></w:r>
                </w:p>
                <w:p><w:r><w:t>Milestone</w:t><w:br/><w:t>end</w:t></w:r></w:p>
              </w:tc></w:tr></w:tbl>"#,
        );
        let (_, grid) = DocumentBody::parse(&xml).unwrap();
        assert_eq!(
            grid.cell(CellCoord::new(0, 0, 0)).unwrap().text(),
            "Focus:\tAction & \nMilestone\nend"
        );
    }

    #[test]
    fn test_grid_span_and_nested_tables() {
        let xml = minimal_document(
            r#"<w:tbl>
                <w:tr>
                  <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Wide</w:t></w:r></w:p></w:tc>
                </w:tr>
                <w:tr>
                  <w:tc><w:p><w:r><w:t>Left</w:t></w:r></w:p>
                    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
                    <w:p/>
                  </w:tc>
                  <w:tc><w:p><w:r><w:t>Right</w:t></w:r></w:p></w:tc>
                </w:tr>
              </w:tbl>"#,
        );
        let (_, grid) = DocumentBody::parse(&xml).unwrap();

        assert_eq!(grid.table_count(), 1);
        let table = &grid.tables()[0];
        assert_eq!(table.rows()[0].cells()[0].grid_span(), 2);
        assert_eq!(grid.cell(CellCoord::new(0, 0, 1)).unwrap().text(), "Wide");
        assert!(!grid.cell(CellCoord::new(0, 1, 0)).unwrap().text().contains("Inner"));
        assert_eq!(grid.cell(CellCoord::new(0, 1, 1)).unwrap().text(), "Right");
    }

    #[test]
    fn test_text_box_tables_are_not_grid_tables() {
        let text_box = r#"<w:p><w:r><w:pict><v:shape><v:textbox><w:txbxContent>
                <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Focus: Improvement (sidebar)</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>
              </w:txbxContent></v:textbox></v:shape></w:pict></w:r></w:p>"#;
        let wrapped = format!(
            "<w:sdt><w:sdtPr/><w:sdtContent>{}</w:sdtContent></w:sdt>",
            table_xml(&[&["Focus: Business Section"], &[""]])
        );
        let xml = minimal_document(&format!(
            "{text_box}{}{wrapped}",
            table_xml(&[&["Focus: Improvement"], &[""]])
        ));
        let (body, grid) = DocumentBody::parse(&xml).unwrap();

        assert_eq!(grid.table_count(), 2);
        assert_eq!(
            grid.cell(CellCoord::new(0, 0, 0)).unwrap().text(),
            "Focus: Improvement"
        );
        assert_eq!(
            grid.cell(CellCoord::new(1, 0, 0)).unwrap().text(),
            "Focus: Business Section"
        );
        assert_eq!(String::from_utf8(body.render(&grid).unwrap()).unwrap(), xml);
    }

    #[test]
    fn test_render_untouched_grid_is_identity() {
        let xml = minimal_document(&table_xml(&[&["A", "B"], &["C", "D"]]));
        let (body, grid) = DocumentBody::parse(&xml).unwrap();
        let out = body.render(&grid).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), xml);
    }

    #[test]
    fn test_render_replaces_written_cell_only() {
        let xml = minimal_document(
            r#"<w:tbl>
                <w:tr><w:tc><w:p><w:r><w:t>Focus: Improvement</w:t></w:r></w:p></w:tc></w:tr>
                <w:tr><w:tc><w:tcPr><w:shd w:fill="EEEEEE"/></w:tcPr><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>type here</w:t></w:r></w:p><w:p/></w:tc></w:tr>
              </w:tbl>"#,
        );
        let (body, mut grid) = DocumentBody::parse(&xml).unwrap();
        write_below(
            &mut grid,
            CellCoord::new(0, 0, 0),
            "Root cause: rework <5%\n- Map process\tA&B",
            &RunStyle::report(),
        );

        let out = String::from_utf8(body.render(&grid).unwrap()).unwrap();

        assert!(out.contains("<w:t>Focus: Improvement</w:t>"));
        assert!(!out.contains("type here"));
        assert!(out.contains(r#"<w:tcPr><w:shd w:fill="EEEEEE"/></w:tcPr>"#));
        assert!(out.contains(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#));
        assert!(out.contains(r#"<w:color w:val="003264"/>"#));
        assert!(out.contains(r#"<w:t xml:space="preserve">Root cause: rework &lt;5%</w:t><w:br/>"#));
        assert!(out.contains(r#"<w:tab/><w:t xml:space="preserve">A&amp;B</w:t>"#));

        let (_, reparsed) = DocumentBody::parse(&out).unwrap();
        assert_eq!(
            reparsed.cell(CellCoord::new(0, 1, 0)).unwrap().text(),
            "Root cause: rework <5%\n- Map process\tA&B"
        );
        assert_eq!(
            reparsed.cell(CellCoord::new(0, 0, 0)).unwrap().text(),
            "Focus: Improvement"
        );
    }

    #[test]
    fn test_render_expands_empty_cell_element() {
        let xml = minimal_document(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Anchor</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc/></w:tr></w:tbl>"#,
        );
        let (body, mut grid) = DocumentBody::parse(&xml).unwrap();
        write_below(&mut grid, CellCoord::new(0, 0, 0), "filled", &RunStyle::report());

        let out = String::from_utf8(body.render(&grid).unwrap()).unwrap();
        let (_, reparsed) = DocumentBody::parse(&out).unwrap();
        assert_eq!(reparsed.cell(CellCoord::new(0, 1, 0)).unwrap().text(), "filled");
    }

    #[test]
    fn test_render_rejects_foreign_grid() {
        let xml = minimal_document(&table_xml(&[&["A"]]));
        let (body, _) = DocumentBody::parse(&xml).unwrap();
        let err = body.render(&DocumentGrid::default()).unwrap_err();
        assert!(matches!(err, DocxError::Malformed(_)));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = DocumentBody::parse("<w:document><w:body></w:document>").unwrap_err();
        assert!(matches!(err, DocxError::Xml(_)));
    }

    #[test]
    fn test_extract_body_text_skips_tables() {
        let xml = minimal_document(&format!(
            "<w:p><w:r><w:t>Interviewer: Tell me about the business.</w:t></w:r></w:p>\
             <w:p/>\
             {}\
             <w:p><w:r><w:t xml:space=\"preserve\">Jamie: We </w:t></w:r><w:hyperlink><w:r><w:t>resole</w:t></w:r></w:hyperlink><w:r><w:t> boots.</w:t></w:r></w:p>",
            table_xml(&[&["table text"]])
        ));
        let text = extract_body_text(&xml).unwrap();
        assert_eq!(
            text,
            "Interviewer: Tell me about the business.\n\nJamie: We resole boots."
        );
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("plain"), "plain");
        assert_eq!(unescape_xml("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape_xml("&#8364;&#x20AC;"), "€€");
        assert_eq!(unescape_xml("R&D; &unknown; & done"), "R&D; &unknown; & done");
    }
}
