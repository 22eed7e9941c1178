use editor_lineops::{LineCommand, LineCommandExecutor, ViewerEvent};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=editor_lineops=trace shows every region and session transition.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let mut executor = LineCommandExecutor::new("alpha\nbeta\ngamma\r\ndelta");

    // Move "beta" up and back down; one undo reverts both moves.
    executor
        .execute(LineCommand::MoveCaret { offset: 7 })
        .unwrap();
    executor.execute(LineCommand::MoveLinesUp).unwrap();
    assert_eq!(executor.text(), "beta\nalpha\ngamma\r\ndelta");
    executor.execute(LineCommand::MoveLinesDown).unwrap();
    executor.execute(LineCommand::Undo).unwrap();
    assert_eq!(executor.text(), "alpha\nbeta\ngamma\r\ndelta");

    // Two consecutive cuts end up in one clipboard entry, CRLF preserved.
    executor
        .execute(LineCommand::MoveCaret { offset: 6 })
        .unwrap();
    executor.execute(LineCommand::CutLine).unwrap();
    executor.execute(LineCommand::CutLine).unwrap();
    assert_eq!(executor.clipboard().contents(), Some("beta\ngamma\r\n"));
    assert_eq!(executor.text(), "alpha\ndelta");

    // A click ends the session; the next cut starts a fresh entry.
    executor.handle_event(ViewerEvent::MouseDown);
    executor.execute(LineCommand::CutLine).unwrap();
    assert_eq!(executor.clipboard().contents(), Some("delta"));

    // Join what is left.
    executor
        .execute(LineCommand::Insert {
            offset: 0,
            text: "one\n    two".to_string(),
        })
        .unwrap();
    executor
        .execute(LineCommand::MoveCaret { offset: 0 })
        .unwrap();
    executor.execute(LineCommand::JoinLines).unwrap();
    println!("{:?}", executor.text());
}
