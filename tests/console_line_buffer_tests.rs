//! Line buffer tests

use uart_pwm_generator::console::line_buffer::LineBuffer;
use uart_pwm_generator::console::parser::MAX_LINE_LEN;

#[test]
fn test_line_buffer_push() {
    let mut buf = LineBuffer::new();

    for &c in b"FREQ 10" {
        assert!(buf.push(c));
    }

    assert_eq!(buf.as_bytes(), b"FREQ 10");
    assert_eq!(buf.len(), 7);
}

#[test]
fn test_line_buffer_clear() {
    let mut buf = LineBuffer::new();

    buf.push(b'O');
    buf.push(b'N');
    buf.clear();

    assert_eq!(buf.as_bytes(), b"");
    assert!(buf.is_empty());
}

#[test]
fn test_line_buffer_overflow() {
    let mut buf = LineBuffer::new();

    // Push 70 characters (capacity is 63)
    for i in 0..70u8 {
        buf.push(b'a' + (i % 26));
    }

    // Should be truncated to capacity
    assert_eq!(buf.len(), MAX_LINE_LEN);
    assert!(buf.is_full());
    assert!(!buf.push(b'z'));
    assert_eq!(buf.as_bytes()[MAX_LINE_LEN - 1], b'a' + ((MAX_LINE_LEN as u8 - 1) % 26));
}

#[test]
fn test_line_buffer_holds_raw_bytes() {
    let mut buf = LineBuffer::new();

    buf.push(0xFF);
    buf.push(0x00);

    assert_eq!(buf.as_bytes(), &[0xFF, 0x00]);
}
