//! ABI bindings of the Transactions contract

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// One stored transfer, in storage field order
    struct TransferStruct {
        address sender;
        address receiver;
        uint256 timestamp;
        string message;
        string keyword;
        uint256 amount;
    }

    function addToBlockchain(address to, string message, uint256 amount, string keyword) external;

    function getAllTransactions() external view returns (TransferStruct[] memory);

    function getTransactionCount() external view returns (uint256);
}
