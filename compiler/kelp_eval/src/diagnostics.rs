//! Live call tracking for interpreted calls.
//!
//! Every interpreted call pushes a [`CallFrame`]; the depth check lives in
//! [`CallStack::push`]. When an error escapes a call body the frames are
//! snapshotted into the error's backtrace.

use kelp_ir::{Name, Span, StringInterner};

use crate::errors::{recursion_limit, BacktraceFrame, EvalError};

#[derive(Copy, Clone, Debug)]
pub(crate) struct CallFrame {
    /// Callee symbol, when the call head was a plain name.
    pub label: Option<Name>,
    /// Where the call was made.
    pub call_span: Option<Span>,
}

#[derive(Debug)]
pub(crate) struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, failing without pushing if the limit is reached.
    pub(crate) fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if self.frames.len() >= self.max_depth {
            return Err(recursion_limit(self.max_depth));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    /// Snapshot the frames, innermost first.
    pub(crate) fn capture(&self, interner: &StringInterner) -> Vec<BacktraceFrame> {
        self.frames
            .iter()
            .rev()
            .map(|f| BacktraceFrame {
                name: f
                    .label
                    .map_or_else(|| "<anonymous>".to_owned(), |n| interner.lookup(n).to_owned()),
                call_span: f.call_span,
            })
            .collect()
    }

    /// Attach a backtrace unless a deeper frame already did.
    pub(crate) fn attach_backtrace(&self, mut err: EvalError, interner: &StringInterner) -> EvalError {
        if err.backtrace.is_empty() {
            err.backtrace = self.capture(interner);
        }
        err
    }
}
