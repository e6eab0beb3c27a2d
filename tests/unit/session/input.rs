use super::*;

fn key(code: i32) -> InputEvent {
    InputEvent::Key {
        keycode: code,
        down: true,
        mods: 0,
    }
}

#[test]
fn overflow_drops_oldest() {
    let mut q = InputQueue::with_capacity(2);
    assert!(!q.push(key(1)));
    assert!(!q.push(key(2)));
    assert!(q.push(key(3)));
    assert_eq!(q.dropped(), 1);
    assert_eq!(q.pop(), Some(key(2)));
    assert_eq!(q.pop(), Some(key(3)));
    assert_eq!(q.pop(), None);
}

#[test]
fn zero_capacity_holds_one() {
    let mut q = InputQueue::with_capacity(0);
    q.push(key(1));
    q.push(key(2));
    assert_eq!(q.len(), 1);
    assert_eq!(q.pop(), Some(key(2)));
}

#[test]
fn drain_empties_in_order() {
    let mut q = InputQueue::default();
    for i in 0..300 {
        q.push(InputEvent::Pointer {
            action: 0,
            x: i as f32,
            y: 0.0,
            buttons: 1,
        });
    }
    assert_eq!(q.len(), INPUT_QUEUE_CAPACITY);
    assert_eq!(q.dropped(), 300 - INPUT_QUEUE_CAPACITY as u64);
    let first = q.drain().next();
    assert!(matches!(first, Some(InputEvent::Pointer { x, .. }) if x == 44.0));
    assert!(q.is_empty());
}
