use editor_lineops::region::compute_moving_selection;
use editor_lineops::{
    CommandResult, DeletionKind, Document, FlatMapper, LineCommand, LineCommandExecutor,
    LineMutationEngine, MemoryClipboard, MoveDirection, NoOpReason, TextBuffer, TextSelection,
    ViewerEvent,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn caret_at(executor: &mut LineCommandExecutor, offset: usize) {
    executor
        .execute(LineCommand::MoveCaret { offset })
        .unwrap();
}

#[test]
fn test_move_beta_up_selects_relocated_line() {
    let mut executor = LineCommandExecutor::new("alpha\nbeta\ngamma");
    caret_at(&mut executor, 8);

    let result = executor.execute(LineCommand::MoveLinesUp).unwrap();

    assert_eq!(executor.text(), "beta\nalpha\ngamma");
    assert_eq!(result, CommandResult::Selection(TextSelection::new(0, 4)));
}

#[test]
fn test_delete_beta_whole() {
    let mut executor = LineCommandExecutor::new("alpha\nbeta\ngamma");
    caret_at(&mut executor, 6);

    executor.execute(LineCommand::DeleteLine).unwrap();

    assert_eq!(executor.text(), "alpha\ngamma");
    assert_eq!(executor.selection(), TextSelection::caret(6));
}

#[test]
fn test_delete_whole_removes_every_touched_line() {
    let mut executor = LineCommandExecutor::new("l0\nl1\r\nl2\rl3\nl4");
    // From inside "l1" to inside "l3".
    executor
        .execute(LineCommand::SetSelection {
            offset: 4,
            length: 7,
        })
        .unwrap();

    executor.execute(LineCommand::DeleteLine).unwrap();

    assert_eq!(executor.text(), "l0\nl4");
    assert_eq!(executor.document().number_of_lines(), 2);
}

#[test]
fn test_delete_whole_on_last_line_keeps_line_count() {
    let mut executor = LineCommandExecutor::new("a\nb");
    caret_at(&mut executor, 2);

    executor.execute(LineCommand::DeleteLine).unwrap();

    assert_eq!(executor.text(), "a\n");
    assert_eq!(executor.document().number_of_lines(), 2);
}

#[test]
fn test_delete_to_beginning_and_end() {
    let mut executor = LineCommandExecutor::new("hello world\nnext");
    caret_at(&mut executor, 6);
    executor.execute(LineCommand::DeleteLineToBeginning).unwrap();
    assert_eq!(executor.text(), "world\nnext");
    assert_eq!(executor.selection(), TextSelection::caret(0));

    caret_at(&mut executor, 2);
    executor.execute(LineCommand::DeleteLineToEnd).unwrap();
    assert_eq!(executor.text(), "wo\nnext");

    // At the end of the content only the delimiter goes.
    executor.execute(LineCommand::DeleteLineToEnd).unwrap();
    assert_eq!(executor.text(), "wonext");
}

#[test]
fn test_delete_to_end_on_last_line_end_is_unchanged() {
    let mut executor = LineCommandExecutor::new("a\nb");
    caret_at(&mut executor, 3);
    let result = executor.execute(LineCommand::DeleteLineToEnd).unwrap();
    assert_eq!(result, CommandResult::Unchanged(NoOpReason::EmptyRegion));
    assert_eq!(executor.text(), "a\nb");
}

#[test]
fn test_move_down_keeps_each_lines_delimiter_position() {
    let mut executor = LineCommandExecutor::new("one\r\ntwo\nthree");
    caret_at(&mut executor, 0);

    executor.execute(LineCommand::MoveLinesDown).unwrap();

    assert_eq!(executor.text(), "two\r\none\nthree");
    assert_eq!(executor.selection(), TextSelection::new(5, 3));
}

#[test]
fn test_copy_lines_down_selects_lower_copy() {
    let mut executor = LineCommandExecutor::new("a\nb\nc");
    executor
        .execute(LineCommand::SetSelection {
            offset: 0,
            length: 3,
        })
        .unwrap();

    executor.execute(LineCommand::CopyLinesDown).unwrap();

    assert_eq!(executor.text(), "a\nb\na\nb\nc");
    assert_eq!(executor.selection(), TextSelection::new(4, 3));
}

#[test]
fn test_join_lines_strips_indentation() {
    let mut executor = LineCommandExecutor::new("foo\n  bar\n");
    caret_at(&mut executor, 1);

    let result = executor.execute(LineCommand::JoinLines).unwrap();

    assert_eq!(executor.text(), "foo bar\n");
    assert_eq!(result, CommandResult::Selection(TextSelection::caret(7)));
}

#[test]
fn test_join_lines_on_last_line_is_unchanged() {
    let mut executor = LineCommandExecutor::new("foo\nbar");
    caret_at(&mut executor, 5);

    let result = executor.execute(LineCommand::JoinLines).unwrap();

    assert_eq!(result, CommandResult::Unchanged(NoOpReason::EdgeOfBuffer));
    assert_eq!(executor.text(), "foo\nbar");
}

#[test]
fn test_trailing_empty_line_moves_like_any_other() {
    let mut executor = LineCommandExecutor::new("a\nb\n");
    caret_at(&mut executor, 4);

    executor.execute(LineCommand::MoveLinesUp).unwrap();
    assert_eq!(executor.text(), "a\n\nb");
    assert_eq!(executor.selection(), TextSelection::caret(2));

    executor.execute(LineCommand::MoveLinesDown).unwrap();
    assert_eq!(executor.text(), "a\nb\n");
}

#[test]
fn test_engine_delete_and_clipboard_are_independent_of_executor() {
    let mut doc = Document::new("x\ny");
    let mut clipboard = MemoryClipboard::new();
    let mut engine = LineMutationEngine::new();

    engine
        .delete_line(
            &mut doc,
            &FlatMapper::new(),
            &mut clipboard,
            TextSelection::caret(0),
            DeletionKind::Whole,
            true,
        )
        .unwrap();

    assert_eq!(doc.text(), "y");
    assert_eq!(clipboard.contents(), Some("x\n"));
}

#[test]
fn test_stale_viewer_selection_aborts_without_editing() {
    let mut executor = LineCommandExecutor::new("alpha\nbeta");
    // The viewer still reports a selection from before the buffer shrank.
    executor.handle_event(ViewerEvent::SelectionChanged(TextSelection::caret(40)));

    for command in [
        LineCommand::CutLine,
        LineCommand::MoveLinesDown,
        LineCommand::CopyLinesUp,
        LineCommand::JoinLines,
    ] {
        assert_eq!(executor.execute(command).unwrap(), CommandResult::Aborted);
    }

    assert_eq!(executor.text(), "alpha\nbeta");
    assert_eq!(executor.clipboard().contents(), None);
    assert!(!executor.document().can_undo());
}

/// Lines of lowercase letters joined by one delimiter kind.
fn random_document(rng: &mut StdRng, allow_empty_lines: bool) -> String {
    let delimiter = ["\n", "\r\n", "\r"][rng.gen_range(0..3)];
    let line_count = rng.gen_range(2..12);
    let min_len = if allow_empty_lines { 0 } else { 1 };
    let lines: Vec<String> = (0..line_count)
        .map(|_| {
            let len = rng.gen_range(min_len..6);
            (0..len)
                .map(|_| (b'a' + rng.gen_range(0..26)) as char)
                .collect()
        })
        .collect();
    lines.join(delimiter)
}

fn random_selection(rng: &mut StdRng, len: usize) -> TextSelection {
    let offset = rng.gen_range(0..=len);
    let length = rng.gen_range(0..=len - offset);
    TextSelection::new(offset, length)
}

#[test]
fn test_random_move_round_trips_restore_text() {
    let mut rng = StdRng::seed_from_u64(0x11e0_5eed);
    let mapper = FlatMapper::new();

    for _ in 0..300 {
        let original = random_document(&mut rng, true);
        let mut doc = Document::new(&original);
        let mut engine = LineMutationEngine::new();
        let selection = random_selection(&mut rng, doc.len());
        let (first, second) = if rng.gen_bool(0.5) {
            (MoveDirection::Up, MoveDirection::Down)
        } else {
            (MoveDirection::Down, MoveDirection::Up)
        };

        // A block ending in an empty line cannot be reselected once it lands on the last line.
        let end_line = selection.end_line(&doc).unwrap();
        if first == MoveDirection::Down
            && end_line + 2 == doc.number_of_lines()
            && doc.line_information(end_line).unwrap().length == 0
        {
            continue;
        }

        let outcome = engine
            .move_or_copy_lines(&mut doc, &mapper, selection, first, false)
            .unwrap();
        let Some(moved) = outcome.selection() else {
            assert_eq!(doc.text(), original);
            continue;
        };
        engine
            .move_or_copy_lines(&mut doc, &mapper, moved, second, false)
            .unwrap();

        assert_eq!(doc.text(), original, "selection {selection:?}, {first:?}");
    }
}

#[test]
fn test_random_copies_grow_by_block_and_delimiter() {
    let mut rng = StdRng::seed_from_u64(0xc0b1);
    let mapper = FlatMapper::new();

    for _ in 0..300 {
        let original = random_document(&mut rng, true);
        let mut doc = Document::new(&original);
        let mut engine = LineMutationEngine::new();
        let selection = random_selection(&mut rng, doc.len());
        let direction = if rng.gen_bool(0.5) {
            MoveDirection::Up
        } else {
            MoveDirection::Down
        };

        let (area, _) = compute_moving_selection(&doc, selection).unwrap();
        let block = doc.get(area.offset, area.length).unwrap();
        let delimiter = doc.default_line_ending().char_len();

        let outcome = engine
            .move_or_copy_lines(&mut doc, &mapper, selection, direction, true)
            .unwrap();

        assert!(outcome.is_applied());
        assert_eq!(doc.len(), original.chars().count() + area.length + delimiter);
        assert_eq!(doc.get(area.offset, area.length).unwrap(), block);
    }
}
