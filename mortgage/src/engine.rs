//! The mortgage workflow engine.

use std::sync::Arc;

use tokio::sync::Mutex;

use parcel_identity::UserRegistry;
use parcel_keys::Keyring;
use parcel_ledger::{LedgerClient, MortgageRecord, MortgageStatus};
use parcel_messages::{
    BurnMarker, CreateMortgage, LedgerMsg, MintMarker, RepayMortgage, TransferMarker,
    TransferShares,
};
use parcel_relay::{Broadcaster, ConfirmationTracker};
use parcel_store::{
    MortgageRequest, MortgageRequestStore, MortgageTerms, PurchaseDetails, RequestStatus,
};
use parcel_types::{Timestamp, TxHash, TxStatus};

use crate::error::MortgageError;
use crate::marker::marker_denom;

/// Outcome of a successful mortgage creation.
#[derive(Clone, Debug)]
pub struct CreateOutcome {
    pub request_id: u64,
    pub mortgage_tx: TxHash,
    /// Hash of the chained purchased-share transfer, when the request
    /// carried purchase details and the transfer was submitted.
    pub transfer_tx: Option<TxHash>,
    /// Whether the chained transfer reached `Confirmed`. A failed transfer
    /// does not roll the mortgage back; the operator reconciles from the
    /// transaction log.
    pub transfer_confirmed: bool,
}

/// Outcome of a successful repayment.
#[derive(Clone, Debug)]
pub struct RepayOutcome {
    pub mortgage_id: u64,
    pub repay_tx: TxHash,
    pub outstanding_after: u128,
    /// Set when this repayment zeroed the balance and the collateral marker
    /// release chain (mint → transfer → burn) was submitted.
    pub collateral_released: bool,
}

/// Drives the request/create/repay mortgage workflow.
pub struct MortgageEngine {
    requests: Arc<dyn MortgageRequestStore + Send + Sync>,
    registry: UserRegistry,
    broadcaster: Arc<Broadcaster>,
    tracker: Arc<ConfirmationTracker>,
    ledger: Arc<dyn LedgerClient>,
    keyring: Arc<dyn parcel_keys::Keyring>,
    /// Signer authorizing chained share transfers.
    regulatory_signer: String,
    /// Module authority signer for marker mint/burn.
    module_signer: String,
    /// Serializes check-then-write spans over the request collection.
    mutation: Mutex<()>,
}

impl MortgageEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requests: Arc<dyn MortgageRequestStore + Send + Sync>,
        registry: UserRegistry,
        broadcaster: Arc<Broadcaster>,
        tracker: Arc<ConfirmationTracker>,
        ledger: Arc<dyn LedgerClient>,
        keyring: Arc<dyn parcel_keys::Keyring>,
        regulatory_signer: impl Into<String>,
        module_signer: impl Into<String>,
    ) -> Self {
        Self {
            requests,
            registry,
            broadcaster,
            tracker,
            ledger,
            keyring,
            regulatory_signer: regulatory_signer.into(),
            module_signer: module_signer.into(),
            mutation: Mutex::new(()),
        }
    }

    /// File a mortgage request. Off-chain only: validates both parties and
    /// persists a `Pending` record for the lender to act on.
    pub async fn request_mortgage(
        &self,
        borrower: &str,
        lender: &str,
        terms: MortgageTerms,
        purchase: Option<PurchaseDetails>,
        now: Timestamp,
    ) -> Result<MortgageRequest, MortgageError> {
        let borrower_user = self.registry.get(borrower)?;
        let lender_user = self.registry.get(lender)?;
        if !lender_user.role.can_lend() {
            return Err(MortgageError::LenderNotBank(lender.to_string()));
        }

        let _guard = self.mutation.lock().await;
        let request = MortgageRequest {
            id: self.requests.next_request_id()?,
            requester: borrower.to_string(),
            lender: lender.to_string(),
            lendee_address: borrower_user.address,
            terms,
            status: RequestStatus::Pending,
            purchase,
            created_at: now,
        };
        self.requests.put_request(&request)?;
        tracing::info!(borrower, lender, id = request.id, "mortgage requested");
        Ok(request)
    }

    /// Create the requested mortgage on the ledger, funded by the lender.
    ///
    /// Must be invoked by the lender the request is addressed to. On
    /// confirmed creation the matching pending request flips to
    /// `Completed`; when the request carries purchase details, a share
    /// transfer authorized by the regulatory signer is chained afterwards.
    /// A failed chained transfer is logged, not rolled back: both
    /// transactions stay independently queryable in the tracked log.
    pub async fn create_mortgage(
        &self,
        lender: &str,
        request_id: u64,
    ) -> Result<CreateOutcome, MortgageError> {
        let request = self
            .requests
            .get_request(request_id)
            .map_err(|_| MortgageError::RequestNotFound(request_id))?;
        if request.status != RequestStatus::Pending {
            return Err(MortgageError::RequestNotPending(request_id));
        }
        if request.lender != lender {
            return Err(MortgageError::NotLender {
                caller: lender.to_string(),
                request_id,
            });
        }

        let lender_address = self.keyring.address_of(lender).map_err(parcel_relay::RelayError::from)?;
        let msg = LedgerMsg::CreateMortgage(CreateMortgage {
            lender: lender_address,
            lendee: request.lendee_address.clone(),
            collateral: request.terms.collateral.clone(),
            amount: request.terms.amount,
            annual_rate_bps: request.terms.annual_rate_bps,
            term_months: request.terms.term_months,
        });
        let mortgage_tx = self.broadcaster.submit(lender, msg).await?;
        let status = self.tracker.await_confirmation(mortgage_tx).await?;
        if status != TxStatus::Confirmed {
            return Err(MortgageError::CreationFailed { hash: mortgage_tx });
        }

        {
            // Match by collateral + lender, mirroring how approvals are
            // correlated; the id-addressed request is the fallback.
            let _guard = self.mutation.lock().await;
            let mut matched = self
                .requests
                .find_pending(lender, &request.terms.collateral)?
                .unwrap_or(request.clone());
            matched.status = RequestStatus::Completed;
            self.requests.put_request(&matched)?;
        }
        tracing::info!(lender, request_id, hash = %mortgage_tx, "mortgage created");

        let (transfer_tx, transfer_confirmed) = match &request.purchase {
            Some(details) => self.chain_purchase_transfer(&request, details).await,
            None => (None, false),
        };

        Ok(CreateOutcome {
            request_id,
            mortgage_tx,
            transfer_tx,
            transfer_confirmed,
        })
    }

    /// Repay part of a mortgage's outstanding amount.
    ///
    /// Rejects when the caller is not the recorded lendee, the mortgage is
    /// not `Approved`, or the amount exceeds the outstanding balance. A
    /// repayment that zeroes the balance chains the collateral marker
    /// release: mint, move lendee → module, burn.
    pub async fn repay_mortgage(
        &self,
        lendee: &str,
        mortgage_id: u64,
        amount: u128,
    ) -> Result<RepayOutcome, MortgageError> {
        let lendee_user = self.registry.get(lendee)?;
        let record = self.ledger.get_mortgage(mortgage_id).await?;

        if record.lendee != lendee_user.address {
            return Err(MortgageError::NotLendee {
                caller: lendee.to_string(),
                mortgage_id,
            });
        }
        if record.status != MortgageStatus::Approved {
            return Err(MortgageError::NotApproved(mortgage_id));
        }
        if amount > record.outstanding_amount {
            return Err(MortgageError::ExceedsOutstanding {
                requested: amount,
                outstanding: record.outstanding_amount,
            });
        }

        let msg = LedgerMsg::RepayMortgage(RepayMortgage {
            lendee: lendee_user.address.clone(),
            mortgage_id,
            amount,
        });
        let repay_tx = self.broadcaster.submit(lendee, msg).await?;
        let status = self.tracker.await_confirmation(repay_tx).await?;
        if status != TxStatus::Confirmed {
            return Err(MortgageError::RepaymentFailed { hash: repay_tx });
        }

        let outstanding_after = record.outstanding_amount - amount;
        let mut collateral_released = false;
        if outstanding_after == 0 {
            self.release_collateral(lendee, &record).await;
            collateral_released = true;
        }

        tracing::info!(
            lendee,
            mortgage_id,
            amount,
            outstanding_after,
            collateral_released,
            "repayment confirmed"
        );
        Ok(RepayOutcome {
            mortgage_id,
            repay_tx,
            outstanding_after,
            collateral_released,
        })
    }

    /// All mortgage requests.
    pub fn list_requests(&self) -> Result<Vec<MortgageRequest>, MortgageError> {
        Ok(self.requests.iter_requests()?)
    }

    async fn chain_purchase_transfer(
        &self,
        request: &MortgageRequest,
        details: &PurchaseDetails,
    ) -> (Option<TxHash>, bool) {
        let authority = match self.keyring.address_of(&self.regulatory_signer) {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(request_id = request.id, "no regulatory signer for chained transfer: {e}");
                return (None, false);
            }
        };

        let total: u64 = details.from_owners.iter().map(|(_, shares)| shares).sum();
        let msg = LedgerMsg::TransferShares(TransferShares {
            authority,
            property_id: details.property_id,
            from_owners: details.from_owners.iter().map(|(a, _)| a.clone()).collect(),
            from_shares: details.from_owners.iter().map(|(_, s)| *s).collect(),
            to_owners: vec![request.lendee_address.clone()],
            to_shares: vec![total],
        });

        match self.broadcaster.submit(&self.regulatory_signer, msg).await {
            Ok(hash) => match self.tracker.await_confirmation(hash).await {
                Ok(TxStatus::Confirmed) => (Some(hash), true),
                Ok(_) | Err(_) => {
                    tracing::error!(
                        request_id = request.id,
                        %hash,
                        "chained purchase transfer did not confirm; mortgage left standing"
                    );
                    (Some(hash), false)
                }
            },
            Err(e) => {
                tracing::error!(
                    request_id = request.id,
                    "chained purchase transfer rejected: {e}; mortgage left standing"
                );
                (None, false)
            }
        }
    }

    /// Mint, move, and burn the single-unit collateral marker. Each leg is
    /// its own tracked transaction; a failed leg is logged and left for
    /// operator reconciliation.
    async fn release_collateral(&self, lendee: &str, record: &MortgageRecord) {
        let denom = marker_denom(&record.collateral, record.index);
        let module = match self.keyring.address_of(&self.module_signer) {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(mortgage_id = record.id, "no module signer for marker release: {e}");
                return;
            }
        };

        let legs: [(&str, LedgerMsg); 3] = [
            (
                &self.module_signer,
                LedgerMsg::MintMarker(MintMarker {
                    authority: module.clone(),
                    denom: denom.clone(),
                    recipient: record.lendee.clone(),
                }),
            ),
            (
                lendee,
                LedgerMsg::TransferMarker(TransferMarker {
                    from: record.lendee.clone(),
                    to: module.clone(),
                    denom: denom.clone(),
                }),
            ),
            (
                &self.module_signer,
                LedgerMsg::BurnMarker(BurnMarker {
                    authority: module,
                    denom: denom.clone(),
                }),
            ),
        ];

        for (signer, msg) in legs {
            let kind = msg.kind();
            match self.broadcaster.submit(signer, msg).await {
                Ok(hash) => match self.tracker.await_confirmation(hash).await {
                    Ok(TxStatus::Confirmed) => {}
                    Ok(_) | Err(_) => {
                        tracing::error!(
                            mortgage_id = record.id,
                            %kind,
                            %hash,
                            "marker release leg did not confirm"
                        );
                        return;
                    }
                },
                Err(e) => {
                    tracing::error!(mortgage_id = record.id, %kind, "marker release leg rejected: {e}");
                    return;
                }
            }
        }
        tracing::info!(mortgage_id = record.id, %denom, "collateral marker burned");
    }
}
