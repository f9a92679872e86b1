use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command};
use std::thread;

use tracing::{debug, info, warn};

use crate::error::ProcessError;

/// Append-only destination for process output and status messages.
///
/// Implementations are called from the stream reader threads, so they must
/// do their own synchronization.
pub trait OutputSink: Send + Sync {
    fn append(&self, text: &str);
}

/// What is left of a finished process once both streams are drained.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub exit_code: Option<i32>,
}

/// A spawned benchmark process whose streams have not been read yet.
pub struct RunningProcess {
    program: String,
    child: Child,
}

/// Starts `cmd`. Fails only if the OS cannot launch the program.
pub fn spawn(mut cmd: Command) -> Result<RunningProcess, ProcessError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let child = cmd.spawn().map_err(|source| ProcessError::Launch {
        program: program.clone(),
        source,
    })?;
    info!(%program, pid = child.id(), "spawned benchmark process");
    Ok(RunningProcess { program, child })
}

/// Spawns `cmd` and waits for it, see [`RunningProcess::wait_with_output`].
pub fn run_to_completion<S: OutputSink + ?Sized>(cmd: Command, sink: &S) -> Result<ProcessOutput, ProcessError> {
    spawn(cmd)?.wait_with_output(sink)
}

impl RunningProcess {
    /// Drains stdout and stderr on two named threads until both hit
    /// end-of-input, then reaps the child.
    ///
    /// Every stdout line goes to the sink and into the returned buffer. Every
    /// stderr line goes to the sink prefixed with `ERROR: `. A failure reading
    /// stderr is reported to the sink and otherwise ignored; a failure reading
    /// stdout fails the run after the child has been reaped.
    pub fn wait_with_output<S: OutputSink + ?Sized>(mut self, sink: &S) -> Result<ProcessOutput, ProcessError> {
        let stdout_result = drain(&mut self.child, sink);
        let status = self.child.wait().map_err(ProcessError::Wait)?;
        info!(program = %self.program, exit_code = ?status.code(), "benchmark process exited");

        Ok(ProcessOutput {
            stdout: stdout_result?,
            exit_code: status.code(),
        })
    }
}

fn drain<S: OutputSink + ?Sized>(child: &mut Child, sink: &S) -> Result<String, ProcessError> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|s| {
        let out_handle = thread::Builder::new()
            .name("stdout-reader".to_string())
            .spawn_scoped(s, || match stdout {
                Some(stream) => read_stdout(stream, sink),
                None => Ok(String::new()),
            })
            .map_err(|source| ProcessError::Stream { stream: "output", source })?;

        let err_handle = thread::Builder::new()
            .name("stderr-reader".to_string())
            .spawn_scoped(s, || match stderr {
                Some(stream) => read_stderr(stream, sink),
                None => Ok(()),
            })
            .map_err(|source| ProcessError::Stream { stream: "error output", source })?;

        let stdout = out_handle.join().map_err(|_| ProcessError::ReaderPanicked("stdout"))?;
        let stderr = err_handle.join().map_err(|_| ProcessError::ReaderPanicked("stderr"))?;

        if let Err(source) = stderr {
            let error = ProcessError::Stream { stream: "error output", source };
            warn!(%error, "stderr stream failed");
            sink.append(&format!("{}\n", error));
        }

        stdout.map_err(|source| ProcessError::Stream { stream: "output", source })
    })
}

/// Calls `f` with every line of `stream`, line terminator removed. Bytes that
/// are not valid UTF-8 are replaced rather than ending the read, so the pipe
/// stays drained until end-of-input.
fn for_each_line(stream: impl Read, mut f: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        f(line.trim_end_matches('\n').trim_end_matches('\r'));
    }
}

fn read_stdout<S: OutputSink + ?Sized>(stream: impl Read, sink: &S) -> io::Result<String> {
    let mut buffer = String::new();
    for_each_line(stream, |line| {
        sink.append(&format!("{}\n", line));
        buffer.push_str(line);
        buffer.push('\n');
    })?;
    debug!(bytes = buffer.len(), "stdout reached end of input");
    Ok(buffer)
}

fn read_stderr<S: OutputSink + ?Sized>(stream: impl Read, sink: &S) -> io::Result<()> {
    for_each_line(stream, |line| sink.append(&format!("ERROR: {}\n", line)))?;
    debug!("stderr reached end of input");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::process::Stdio;
    use std::sync::Mutex;

    /// Collects everything appended, in order.
    #[derive(Default)]
    pub(crate) struct RecordingSink(pub Mutex<Vec<String>>);

    impl RecordingSink {
        pub(crate) fn text(&self) -> String {
            self.0.lock().unwrap().concat()
        }
    }

    impl OutputSink for RecordingSink {
        fn append(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_stdout_is_buffered_and_logged() {
        let sink = RecordingSink::default();
        let out = read_stdout("[\n  {}\n]".as_bytes(), &sink).unwrap();
        assert_eq!(out, "[\n  {}\n]\n");
        assert_eq!(sink.text(), out);
    }

    #[test]
    fn test_stderr_lines_are_prefixed() {
        let sink = RecordingSink::default();
        read_stderr("Unknown algorithm 'x'.\nbye".as_bytes(), &sink).unwrap();
        assert_eq!(sink.text(), "ERROR: Unknown algorithm 'x'.\nERROR: bye\n");
    }

    #[test]
    fn test_invalid_utf8_does_not_stop_the_reader() {
        let sink = RecordingSink::default();
        read_stderr(&b"bad \xff byte\r\nstill here\n"[..], &sink).unwrap();
        assert_eq!(sink.text(), "ERROR: bad \u{FFFD} byte\nERROR: still here\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_survives_invalid_stderr_bytes() {
        let sink = RecordingSink::default();
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg("printf 'bad \\377 byte\\n' >&2; i=0; while [ $i -lt 2000 ]; do echo noise >&2; i=$((i+1)); done; echo '[]'")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = run_to_completion(cmd, &sink).unwrap();

        assert_eq!(output.stdout, "[]\n");
        assert_eq!(output.exit_code, Some(0));
        assert!(sink.text().contains("ERROR: bad \u{FFFD} byte\n"), "{}", sink.text());
    }

    #[test]
    fn test_missing_program_is_a_launch_error() {
        let sink = RecordingSink::default();
        let cmd = Command::new("./definitely-not-a-benchmark-executable");
        let result = run_to_completion(cmd, &sink);
        assert!(matches!(result, Err(ProcessError::Launch { .. })));
        assert!(sink.text().is_empty());
    }
}
