//! epoll adapter for the [`Multiplexer`] and [`Register`] ports.
//!
//! Every registered descriptor carries its [`EventSource`] token in
//! `epoll_event.data`, so a wait batch maps straight back to tags.

use std::os::fd::AsFd;

use log::{error, warn};
use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};

use crate::app::ports::{Interest, Multiplexer, Register};
use crate::error::MuxError;
use crate::events::{EventSource, MAX_READY, ReadySet};

pub struct EpollMux {
    epoll: Epoll,
    events: [EpollEvent; MAX_READY],
    registered: usize,
}

impl EpollMux {
    pub fn new() -> Result<Self, MuxError> {
        let epoll = Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC).map_err(|e| {
            error!("epoll: create failed: {}", e);
            MuxError::CreateFailed
        })?;
        Ok(Self {
            epoll,
            events: [EpollEvent::empty(); MAX_READY],
            registered: 0,
        })
    }

    /// Number of sources registered so far.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

fn flags_for(interest: Interest) -> EpollFlags {
    match interest {
        Interest::Readable => EpollFlags::EPOLLIN,
        // sysfs signals a GPIO edge as POLLPRI | POLLERR on the value file.
        Interest::Priority => EpollFlags::EPOLLPRI | EpollFlags::EPOLLERR,
    }
}

impl<S: AsFd + ?Sized> Register<S> for EpollMux {
    fn register(&mut self, source: &S, tag: EventSource, interest: Interest) -> Result<(), MuxError> {
        let event = EpollEvent::new(flags_for(interest), tag.to_token());
        self.epoll.add(source.as_fd(), event).map_err(|e| {
            error!("epoll: registering {} failed: {}", tag, e);
            MuxError::RegisterFailed(tag)
        })?;
        self.registered += 1;
        Ok(())
    }
}

impl Multiplexer for EpollMux {
    fn wait(&mut self, ready: &mut ReadySet) -> Result<(), MuxError> {
        let n = loop {
            match self.epoll.wait(&mut self.events, EpollTimeout::NONE) {
                Ok(n) => break n,
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    error!("epoll: wait failed: {}", e);
                    return Err(MuxError::WaitFailed);
                }
            }
        };

        ready.clear();
        for event in &self.events[..n] {
            match EventSource::from_token(event.data()) {
                // n <= MAX_READY, so the push cannot overflow.
                Some(source) => {
                    let _ = ready.push(source);
                }
                None => warn!("epoll: unknown token {}", event.data()),
            }
        }
        Ok(())
    }
}
