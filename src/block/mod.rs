
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{DigSigProcErr as DSPErr};


pub const CHANNEL_CAPACITY:usize = 10;

pub enum BlockResult<U> {
	NotReady,
	Ready(U),
	Err(DSPErr)
}

// A type that implements BlockFunctionality consumes instances of T and
// produces either Ready(U) if an output is ready, NotReady if an output
// is not ready, or Err(_) if the operation fails
pub trait BlockFunctionality<C, D, T, U> {

	fn control(&mut self, control:&C) -> Result<D, DSPErr>;
	fn apply(&mut self, input:&T) -> BlockResult<U>;

}

pub struct Block<C: 'static + Send, T: 'static + Send, U: 'static + Send> {
	pub tx_control: mpsc::Sender<C>,
	pub tx_input:   mpsc::Sender<T>,
	pub rx_output:  mpsc::Receiver<U>,
	pub handles:    Vec<JoinHandle<Result<(), DSPErr>>>,
}

impl<C: Send, T: Send, U: Send> Block<C, T, U> {

	/// Moves b onto its own task.  Must be called from within a tokio runtime.
	pub fn from<B: 'static + BlockFunctionality<C, (), T, U> + Send>(b:B) -> Self {

		let (tx_control, mut rx_control) = mpsc::channel::<C>(CHANNEL_CAPACITY);
		let (tx_input,   mut rx_input)   = mpsc::channel::<T>(CHANNEL_CAPACITY);
		let (tx_output,      rx_output)  = mpsc::channel::<U>(CHANNEL_CAPACITY);

		let handle:JoinHandle<Result<(), DSPErr>> = tokio::spawn(async move {

			let mut owned_b = b;

			'rx: while let Some(t) = rx_input.recv().await {

				// Interleaving control handling with input handling prevents us from having to
				// use a mutex to protect the state
				while let Ok(c) = rx_control.try_recv() {
					owned_b.control(&c)?;
				}

				match owned_b.apply(&t) {
					BlockResult::Ready(u) => tx_output.send(u).await.map_err(|_| DSPErr::Other("Unable to send output"))?,
					BlockResult::NotReady => (),
					BlockResult::Err(e)   => {
						log::error!("Error in block: {}", e);
						break 'rx;
					}
				}

			}

			Ok(())
		});

		Block{ tx_control, tx_input, rx_output, handles: vec![handle] }
	}

	/// Closes the inputs, discards outputs nobody collected, and waits for every task of the block to finish
	pub async fn shutdown(self) -> Result<(), DSPErr> {

		let Block{ tx_control, tx_input, mut rx_output, handles } = self;

		drop(tx_control);
		drop(tx_input);
		while rx_output.recv().await.is_some() { }

		for handle in handles {
			handle.await.map_err(|_| DSPErr::Other("Block task panicked"))??;
		}

		Ok(())
	}

}
