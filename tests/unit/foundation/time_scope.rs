use super::*;

struct Playhead(FrameIndex);

impl TimeCursor for Playhead {
    fn current_frame(&self) -> FrameIndex {
        self.0
    }

    fn set_current_frame(&mut self, frame: FrameIndex) {
        self.0 = frame;
    }
}

fn sample_or_fail(host: &mut Playhead, frame: i64, fail: bool) -> Result<i64, String> {
    let scoped = ScopedTime::enter(host, FrameIndex(frame));
    if fail {
        return Err(format!("failed at {}", scoped.current_frame()));
    }
    Ok(scoped.current_frame().0)
}

#[test]
fn guard_moves_and_restores() {
    let mut head = Playhead(FrameIndex(1));
    {
        let scoped = ScopedTime::enter(&mut head, FrameIndex(9));
        assert_eq!(scoped.current_frame(), FrameIndex(9));
        assert_eq!(scoped.restores_to(), FrameIndex(1));
    }
    assert_eq!(head.0, FrameIndex(1));
}

#[test]
fn guard_restores_on_early_return() {
    let mut head = Playhead(FrameIndex(4));
    assert_eq!(sample_or_fail(&mut head, 12, false), Ok(12));
    assert_eq!(head.0, FrameIndex(4));
    assert!(sample_or_fail(&mut head, 13, true).is_err());
    assert_eq!(head.0, FrameIndex(4));
}

#[test]
fn nested_guards_unwind_in_order() {
    let mut head = Playhead(FrameIndex(0));
    {
        let mut outer = ScopedTime::enter(&mut head, FrameIndex(5));
        {
            let inner = ScopedTime::enter(&mut *outer, FrameIndex(6));
            assert_eq!(inner.current_frame(), FrameIndex(6));
        }
        assert_eq!(outer.current_frame(), FrameIndex(5));
    }
    assert_eq!(head.0, FrameIndex(0));
}
