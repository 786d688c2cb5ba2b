#![forbid(unsafe_code)]

use commitgate_contracts::{Controller, RecordUpdateRequest};

use crate::error::{UnauthorizedReason, UpdateError};

/// Ask the controller named by the request's preimages to approve the transition.
///
/// `controller` is the instance resolved for `request.current_value_preimages.controller`;
/// `None` means the identity resolves to nothing callable, which fails like a reverted call.
/// A controller's own error is carried out unchanged.
pub fn authorize_transition(
    controller: Option<&dyn Controller>,
    request: &RecordUpdateRequest,
) -> Result<(), UpdateError> {
    let controller_id = request.current_value_preimages.controller;
    let Some(controller) = controller else {
        return Err(UpdateError::Unauthorized {
            id: request.id,
            controller: controller_id,
            reason: UnauthorizedReason::ControllerUnavailable,
        });
    };

    match controller.authorize(
        &request.id,
        &request.current_value,
        &request.new_value,
        &request.proof,
    ) {
        Ok(true) => Ok(()),
        Ok(false) => Err(UpdateError::Unauthorized {
            id: request.id,
            controller: controller_id,
            reason: UnauthorizedReason::Rejected,
        }),
        Err(source) => Err(UpdateError::ControllerFailed {
            controller: controller_id,
            source,
        }),
    }
}
