use parking_lot::Mutex;
use std::{
  future::Future,
  sync::Arc,
  task::{Context, Poll, Waker},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
  Cancel,
  Timeout,
}

#[derive(Debug)]
struct SignalState {
  signal: Option<Signal>,
  waker: Option<Waker>,
}

pub struct Receiver<'a> {
  is_notified: bool,
  signal: &'a CirroRunSignal,
}

#[derive(Clone, Debug)]
pub struct CirroRunSignal {
  state: Arc<Mutex<SignalState>>,
}

impl CirroRunSignal {
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(SignalState {
        signal: None,
        waker: None,
      })),
    }
  }

  pub fn recv(&self) -> Receiver {
    Receiver {
      signal: self,
      is_notified: false,
    }
  }

  pub fn cancel(&self) {
    let mut state = self.state.lock();

    state.signal = Some(Signal::Cancel);

    if let Some(waker) = state.waker.take() {
      waker.wake();
    }
  }

  pub fn timeout(&self) {
    let mut state = self.state.lock();

    state.signal = Some(Signal::Timeout);

    if let Some(waker) = state.waker.take() {
      waker.wake();
    }
  }

  pub fn is_cancelled(&self) -> bool {
    self.state.lock().signal == Some(Signal::Cancel)
  }

  pub fn is_timeout(&self) -> bool {
    self.state.lock().signal == Some(Signal::Timeout)
  }
}

impl Default for CirroRunSignal {
  fn default() -> Self {
    Self::new()
  }
}

impl<'a> Future for Receiver<'a> {
  type Output = Signal;

  fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut state = self.signal.state.lock();

    if self.is_notified {
      return Poll::Pending;
    }

    if let Some(signal) = state.signal {
      self.get_mut().is_notified = true;

      Poll::Ready(signal)
    } else {
      state.waker = Some(cx.waker().clone());
      Poll::Pending
    }
  }
}

impl ToString for Signal {
  fn to_string(&self) -> String {
    match self {
      Signal::Cancel => "cancel".to_string(),
      Signal::Timeout => "timeout".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::pin::Pin;

  #[cirro_run_test::test]
  async fn test_wait_for_cancel_signal() {
    let signal = CirroRunSignal::new();
    assert!(!signal.is_cancelled());
    assert!(!signal.is_timeout());

    let receiver = signal.recv();

    let cloned_signal = signal.clone();

    tokio::spawn(async move {
      tokio::time::sleep(std::time::Duration::from_millis(100)).await;
      cloned_signal.cancel();
    });

    assert_eq!(receiver.await, Signal::Cancel);
    assert!(signal.is_cancelled());
    assert!(!signal.is_timeout());
  }

  #[cirro_run_test::test]
  async fn test_wait_for_timeout_signal() {
    let signal = CirroRunSignal::new();

    let receiver = signal.recv();

    let cloned_signal = signal.clone();

    tokio::spawn(async move {
      tokio::time::sleep(std::time::Duration::from_millis(100)).await;
      cloned_signal.timeout();
    });

    assert_eq!(receiver.await, Signal::Timeout);
    assert!(!signal.is_cancelled());
    assert!(signal.is_timeout());
  }

  #[cirro_run_test::test]
  fn to_string() {
    assert_eq!(Signal::Cancel.to_string(), "cancel".to_string());
    assert_eq!(Signal::Timeout.to_string(), "timeout".to_string());
  }

  #[cirro_run_test::test]
  async fn test_wait_signal_twice() {
    std::future::poll_fn(|cx| {
      let signal = CirroRunSignal::new();

      signal.cancel();

      let receiver = &mut signal.recv();
      let mut receiver = Pin::new(receiver);
      let res = receiver.as_mut().poll(cx);

      assert_eq!(res, Poll::Ready(Signal::Cancel));
      assert!(signal.is_cancelled());

      let res = receiver.poll(cx);

      assert_eq!(res, Poll::Pending);
      Poll::Ready(())
    })
    .await;
  }
}
